#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;
    use std::path::PathBuf;

    /// Creates a temporary route table with a unique name
    ///
    /// The file outlives the handle; remove it with [`cleanup_temp_files`].
    pub fn create_temp_table(content: &str, ext: &str) -> PathBuf {
        let mut file = tempfile::Builder::new()
            .prefix("routetree_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.into_temp_path().keep().unwrap()
    }

    pub fn create_temp_yaml(content: &str) -> PathBuf {
        create_temp_table(content, "yaml")
    }

    pub fn create_temp_toml(content: &str) -> PathBuf {
        create_temp_table(content, "toml")
    }

    pub fn create_temp_json(content: &str) -> PathBuf {
        create_temp_table(content, "json")
    }

    /// Cleanup temporary files (best effort)
    pub fn cleanup_temp_files(paths: &[PathBuf]) {
        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

pub mod tables {
    /// A small blog application: default action, id routes, archive, assets
    pub const BLOG_YAML: &str = r#"
validators:
  slug: "[a-z0-9-]+"
controllers:
  home:
    actions:
      index: [GET]
  blog:
    actions:
      list: [GET]
      show: [GET]
      edit: [GET, POST]
      delete: [DELETE]
  archive:
    actions:
      month: [GET]
  assets: {}
routes:
  - pattern: /
    controller: home
  - pattern: /blog/<action=list>
    controller: blog
  - pattern: /post/<id:int>/<action=show>
    controller: blog
  - pattern: /archive/<year:int(4)>-<month:int(1~2)>/<title:slug>.html
    controller: archive
  - pattern: /assets/*pathInfo
    controller: assets
"#;
}
