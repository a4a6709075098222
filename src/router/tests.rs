use super::{MatchResult, RouteMatch, RouteOption, RouteTree, Router};
use crate::endpoint::ControllerEndpoint;
use crate::error::{PathError, RouteError};
use http::Method;
use std::sync::Arc;

fn controller(name: &str, actions: &[(&str, &[Method])]) -> Arc<ControllerEndpoint> {
    let mut endpoint = ControllerEndpoint::new(name);
    for (action, methods) in actions {
        endpoint.add_action(*action, methods.iter().cloned());
    }
    Arc::new(endpoint)
}

fn plain(name: &str) -> Arc<ControllerEndpoint> {
    controller(name, &[])
}

fn tree_with(routes: &[(&str, &str)]) -> RouteTree<ControllerEndpoint> {
    let mut tree = RouteTree::new();
    for (pattern, name) in routes {
        tree.add_route(pattern, plain(name)).unwrap();
    }
    tree
}

fn get(tree: &RouteTree<ControllerEndpoint>, path: &str) -> Option<RouteMatch<ControllerEndpoint>> {
    tree.lookup(&Method::GET, path).into_match()
}

fn endpoint_of(tree: &RouteTree<ControllerEndpoint>, path: &str) -> Option<String> {
    get(tree, path).map(|m| m.endpoint.controller().to_string())
}

#[test]
fn test_static_routes_match_exactly() {
    let tree = tree_with(&[("/blog/list", "list"), ("/blog/archive/2020", "archive")]);

    assert_eq!(endpoint_of(&tree, "/blog/list").as_deref(), Some("list"));
    assert_eq!(endpoint_of(&tree, "/blog/list/").as_deref(), Some("list"));
    assert_eq!(endpoint_of(&tree, "//blog//list").as_deref(), Some("list"));
    assert_eq!(endpoint_of(&tree, "/blog/./list").as_deref(), Some("list"));
    assert_eq!(endpoint_of(&tree, "/blog/archive/2020").as_deref(), Some("archive"));

    assert!(get(&tree, "/blog").is_none());
    assert!(get(&tree, "/blog/lis").is_none());
    assert!(get(&tree, "/blog/list/extra").is_none());
    assert!(get(&tree, "/blog/archive").is_none());
}

#[test]
fn test_root_endpoint() {
    let mut tree = tree_with(&[("/", "home"), ("/about", "about")]);
    assert_eq!(endpoint_of(&tree, "/").as_deref(), Some("home"));
    assert_eq!(endpoint_of(&tree, "").as_deref(), Some("home"));
    assert_eq!(endpoint_of(&tree, "/about").as_deref(), Some("about"));

    let err = tree.add_route("/", plain("again")).unwrap_err();
    assert!(matches!(err, RouteError::DuplicateRoute { .. }));
    assert_eq!(endpoint_of(&tree, "/").as_deref(), Some("home"));
}

#[test]
fn test_root_without_endpoint_is_not_found() {
    let tree = tree_with(&[("/about", "about")]);
    assert!(matches!(tree.lookup(&Method::GET, "/"), MatchResult::NotFound));
}

#[test]
fn test_parent_segment_is_malformed() {
    let tree = tree_with(&[("/a/b", "ab")]);
    match tree.lookup(&Method::GET, "/a/../b") {
        MatchResult::MalformedPath(PathError::ParentSegment { path }) => {
            assert_eq!(path, "/a/../b");
        }
        other => panic!("expected malformed path, got {other:?}"),
    }
}

#[test]
fn test_int_param_with_exact_length() {
    let tree = tree_with(&[("/blog/edit-<id:int(5)>", "edit")]);

    let m = get(&tree, "/blog/edit-12345").unwrap();
    assert_eq!(m.param("id"), Some("12345"));
    assert_eq!(&*m.pattern, "/blog/edit-<id:int(5)>");

    assert!(get(&tree, "/blog/edit-1234").is_none());
    assert!(get(&tree, "/blog/edit-123456").is_none());
    assert!(get(&tree, "/blog/edit-abcde").is_none());
}

#[test]
fn test_multiple_params_in_one_segment() {
    let tree = tree_with(&[("/<year:int(4)>-<month:int(2)>", "archive")]);
    let m = get(&tree, "/2024-07").unwrap();
    assert_eq!(m.param("year"), Some("2024"));
    assert_eq!(m.param("month"), Some("07"));
    assert!(get(&tree, "/2024-7").is_none());
    assert!(get(&tree, "/202407").is_none());
}

#[test]
fn test_params_accumulate_across_depths() {
    let tree = tree_with(&[("/<user:word>/posts/<id:int>/<action>", "posts")]);
    let m = get(&tree, "/alice/posts/7/edit").unwrap();
    assert_eq!(m.param("user"), Some("alice"));
    assert_eq!(m.param("id"), Some("7"));
    assert_eq!(m.param("action"), Some("edit"));
    assert_eq!(m.selector(), Some("edit"));
    assert_eq!(m.params.len(), 3);
}

#[test]
fn test_enum_param() {
    let tree = tree_with(&[("/paint/<color:enum(red|green)>", "paint")]);
    assert_eq!(get(&tree, "/paint/red").unwrap().param("color"), Some("red"));
    assert!(get(&tree, "/paint/blue").is_none());
    // the alternative must consume the whole segment
    assert!(get(&tree, "/paint/redish").is_none());
}

#[test]
fn test_enum_param_followed_by_literal() {
    let tree = tree_with(&[("/cars/<color:enum(red|green|blue)>-car", "cars")]);
    assert_eq!(get(&tree, "/cars/red-car").unwrap().param("color"), Some("red"));
    assert_eq!(get(&tree, "/cars/blue-car").unwrap().param("color"), Some("blue"));
    assert!(get(&tree, "/cars/purple-car").is_none());
    assert!(get(&tree, "/cars/red-bike").is_none());
}

#[test]
fn test_failed_branch_does_not_leak_params() {
    let tree = tree_with(&[
        ("/<section:word>/<id:int>", "numeric"),
        ("/<slug>/about", "about"),
    ]);
    let m = get(&tree, "/news/about").unwrap();
    assert_eq!(m.endpoint.controller(), "about");
    assert_eq!(m.param("slug"), Some("news"));
    assert_eq!(m.param("section"), None);
    assert_eq!(m.params.len(), 1);
}

#[test]
fn test_registration_order_wins() {
    let tree = tree_with(&[("/<name:word>", "word"), ("/<id:int>", "int")]);
    // both accept "42"; the first registered sibling wins
    assert_eq!(endpoint_of(&tree, "/42").as_deref(), Some("word"));

    let tree = tree_with(&[("/<id:int>", "int"), ("/<name:word>", "word")]);
    assert_eq!(endpoint_of(&tree, "/42").as_deref(), Some("int"));
    assert_eq!(endpoint_of(&tree, "/abc").as_deref(), Some("word"));
}

#[test]
fn test_static_before_param_when_registered_first() {
    let tree = tree_with(&[("/users/me", "me"), ("/users/<id>", "user")]);
    assert_eq!(endpoint_of(&tree, "/users/me").as_deref(), Some("me"));
    let m = get(&tree, "/users/bob").unwrap();
    assert_eq!(m.endpoint.controller(), "user");
    assert_eq!(m.param("id"), Some("bob"));
}

#[test]
fn test_catch_all() {
    let tree = tree_with(&[("/files/*pathInfo", "files")]);

    let m = get(&tree, "/files/a/b.txt").unwrap();
    assert_eq!(m.path_info(), Some("a/b.txt"));

    let m = get(&tree, "/files/a/b/").unwrap();
    assert_eq!(m.path_info(), Some("a/b/"));

    let m = get(&tree, "/files/").unwrap();
    assert_eq!(m.path_info(), Some(""));

    let m = get(&tree, "/files").unwrap();
    assert_eq!(m.path_info(), Some(""));

    assert!(get(&tree, "/other/a").is_none());
}

#[test]
fn test_catch_all_absorbs_very_long_paths() {
    let tree = tree_with(&[("/files/*pathInfo", "files"), ("/other/<x>", "other")]);
    let path = format!("/files{}", "/a".repeat(70_000));
    let m = get(&tree, &path).unwrap();
    assert_eq!(m.endpoint.controller(), "files");
    let path_info = m.path_info().unwrap();
    assert_eq!(path_info.split('/').count(), 70_000);
    assert!(path_info.starts_with("a/a/"));
}

#[test]
fn test_catch_all_after_params() {
    let tree = tree_with(&[("/repo/<owner:word>/*pathInfo", "repo")]);
    let m = get(&tree, "/repo/alice/src/lib.rs").unwrap();
    assert_eq!(m.param("owner"), Some("alice"));
    assert_eq!(m.path_info(), Some("src/lib.rs"));
}

#[test]
fn test_catch_all_registration_rules() {
    let mut tree = RouteTree::<ControllerEndpoint>::new();
    let err = tree
        .add_route("/files/*pathInfo/more", plain("x"))
        .unwrap_err();
    assert!(matches!(err, RouteError::CatchAllNotLast { .. }));

    let err = tree.add_route("/files/*rest", plain("x")).unwrap_err();
    assert!(matches!(err, RouteError::InvalidCatchAll { .. }));

    tree.add_route("/files/*pathInfo", plain("files")).unwrap();
    let err = tree.add_route("/files/<name>", plain("x")).unwrap_err();
    assert!(matches!(err, RouteError::CatchAllConflict { .. }));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_duplicate_registration_keeps_first() {
    let mut tree = tree_with(&[("/blog/<id:int>", "first")]);
    let err = tree.add_route("/blog/<id:int>", plain("second")).unwrap_err();
    assert!(matches!(
        err,
        RouteError::DuplicateRoute { ref pattern } if pattern == "/blog/<id:int>"
    ));
    assert_eq!(endpoint_of(&tree, "/blog/1").as_deref(), Some("first"));
    assert_eq!(tree.len(), 1);

    // same segments written differently are distinct nodes
    tree.add_route("/blog/<id:int(1~255)>", plain("third")).unwrap();
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_syntax_errors_do_not_register() {
    let mut tree = RouteTree::<ControllerEndpoint>::new();
    for pattern in ["/a/<id", "/a/id>", "/a/<<id>>", "/a/<1id>", "/a/../b", "/a/<id:int(999)>"] {
        let err = tree.add_route(pattern, plain("x")).unwrap_err();
        assert!(err.is_syntax(), "{pattern} should be a syntax error, got {err}");
        assert_eq!(err.pattern(), pattern);
    }
    assert!(tree.is_empty());
    assert!(tree.root().children().is_empty());
}

#[test]
fn test_default_value_fallback() {
    let blog = controller(
        "blog",
        &[("list", &[Method::GET]), ("edit", &[Method::GET, Method::POST])],
    );
    let mut tree = RouteTree::new();
    tree.add_route("/blog/<action=list>", blog).unwrap();

    let m = tree.lookup(&Method::GET, "/blog").into_match().unwrap();
    assert_eq!(m.param("action"), Some("list"));
    assert_eq!(m.selector(), Some("list"));
    assert!(m.is_dispatchable(&Method::GET));

    let m = tree.lookup(&Method::POST, "/blog/edit").into_match().unwrap();
    assert_eq!(m.selector(), Some("edit"));

    // list is GET only, so the default is refused for POST
    assert!(matches!(tree.lookup(&Method::POST, "/blog"), MatchResult::NotFound));
}

#[test]
fn test_default_refused_when_action_missing() {
    let blog = controller("blog", &[("show", &[])]);
    let mut tree = RouteTree::new();
    tree.add_route("/blog/<action=list>", blog).unwrap();
    assert!(matches!(tree.lookup(&Method::GET, "/blog"), MatchResult::NotFound));
    assert!(tree.lookup(&Method::GET, "/blog/show").is_match());
}

#[test]
fn test_explicit_selector_is_not_capability_checked() {
    let blog = controller("blog", &[("list", &[Method::GET])]);
    let mut tree = RouteTree::new();
    tree.add_route("/blog/<action=list>", blog).unwrap();

    let m = tree.lookup(&Method::GET, "/blog/delete").into_match().unwrap();
    assert_eq!(m.selector(), Some("delete"));
    assert!(!m.is_dispatchable(&Method::GET));
}

#[test]
fn test_non_selector_default_needs_no_capability() {
    let mut tree = RouteTree::new();
    tree.add_route("/feed/<format=rss>", plain("feed")).unwrap();
    let m = tree.lookup(&Method::DELETE, "/feed").into_match().unwrap();
    assert_eq!(m.param("format"), Some("rss"));
    assert_eq!(m.selector(), None);
    assert!(m.is_dispatchable(&Method::DELETE));
}

#[test]
fn test_chained_defaults() {
    let shop = controller("shop", &[("index", &[Method::GET])]);
    let mut tree = RouteTree::new();
    tree.add_route("/shop/<action=index>/<page=1>", shop).unwrap();

    let m = tree.lookup(&Method::GET, "/shop").into_match().unwrap();
    assert_eq!(m.param("action"), Some("index"));
    assert_eq!(m.param("page"), Some("1"));

    let m = tree.lookup(&Method::GET, "/shop/index").into_match().unwrap();
    assert_eq!(m.param("page"), Some("1"));

    let m = tree.lookup(&Method::GET, "/shop/index/3").into_match().unwrap();
    assert_eq!(m.param("page"), Some("3"));
}

#[test]
fn test_no_default_when_node_has_several_children() {
    let mut tree = RouteTree::new();
    tree.add_route("/feed/<format=rss>", plain("feed")).unwrap();
    tree.add_route("/feed/latest", plain("latest")).unwrap();
    assert!(matches!(tree.lookup(&Method::GET, "/feed"), MatchResult::NotFound));
    assert!(tree.lookup(&Method::GET, "/feed/atom").is_match());
}

#[test]
fn test_root_default_fallback() {
    let home = controller("home", &[("index", &[Method::GET])]);
    let mut tree = RouteTree::new();
    tree.add_route("/<action=index>", home).unwrap();
    let m = tree.lookup(&Method::GET, "/").into_match().unwrap();
    assert_eq!(m.selector(), Some("index"));
}

#[test]
fn test_custom_selector_name() {
    let api = controller("api", &[("v1", &[Method::GET])]);
    let mut tree = RouteTree::new().with_selector("version");
    tree.add_route("/api/<version=v1>", api.clone()).unwrap();
    tree.add_route("/api2/<version=v2>", api).unwrap();

    let m = tree.lookup(&Method::GET, "/api").into_match().unwrap();
    assert_eq!(m.selector(), Some("v1"));
    assert!(matches!(tree.lookup(&Method::GET, "/api2"), MatchResult::NotFound));
}

#[test]
fn test_unknown_validator_is_not_found() {
    let mut tree = RouteTree::<ControllerEndpoint>::new();
    tree.add_route("/color/<hex:hex>", plain("color")).unwrap();
    assert!(matches!(tree.lookup(&Method::GET, "/color/ff00ff"), MatchResult::NotFound));

    tree.validators_mut().register_regex("hex", "[0-9a-f]+").unwrap();
    let m = tree.lookup(&Method::GET, "/color/ff00ff").into_match().unwrap();
    assert_eq!(m.param("hex"), Some("ff00ff"));
}

#[test]
fn test_missing_validators_are_reported() {
    let mut tree = tree_with(&[("/color/<hex:hex>", "color"), ("/id/<id:int>", "id")]);
    tree.add_route("/code/<a:upper>-<b:hex>", plain("code")).unwrap();
    assert_eq!(tree.missing_validators(), vec!["hex", "upper"]);

    tree.validators_mut().register_regex("hex", "[0-9a-f]+").unwrap();
    tree.validators_mut().register_regex("upper", "[A-Z]+").unwrap();
    assert!(tree.missing_validators().is_empty());
}

#[test]
fn test_custom_validator() {
    let mut tree = RouteTree::<ControllerEndpoint>::new();
    tree.register_validator("upper", |s: &str, opt: &RouteOption| {
        let n = s.bytes().take_while(u8::is_ascii_uppercase).count();
        if opt.len_within(n) {
            &s[..n]
        } else {
            ""
        }
    });
    tree.add_route("/code/<code:upper(3)>", plain("code")).unwrap();
    assert_eq!(get(&tree, "/code/ABC").unwrap().param("code"), Some("ABC"));
    assert!(get(&tree, "/code/AB").is_none());
    assert!(get(&tree, "/code/abc").is_none());
}

#[test]
fn test_misbehaving_validator_cannot_panic() {
    let mut tree = RouteTree::<ControllerEndpoint>::new();
    tree.register_validator("liar", |_: &str, _: &RouteOption| "much longer than input");
    tree.add_route("/x/<v:liar>", plain("x")).unwrap();
    assert!(get(&tree, "/x/a").is_none());
}

#[test]
fn test_pruning_by_depth() {
    let tree = tree_with(&[("/a/b/c", "abc"), ("/a/<x>", "ax")]);
    assert_eq!(endpoint_of(&tree, "/a/b/c").as_deref(), Some("abc"));
    assert_eq!(endpoint_of(&tree, "/a/b").as_deref(), Some("ax"));
    assert!(get(&tree, "/a/b/c/d").is_none());
    assert_eq!(tree.root().max_depth(), 4);
}

#[test]
fn test_lookup_is_deterministic() {
    let tree = tree_with(&[
        ("/<a:word>/<b:int>", "one"),
        ("/<c>/<d>", "two"),
        ("/x/*pathInfo", "three"),
    ]);
    for path in ["/x/1", "/x/y", "/foo/2", "/x/y/z"] {
        let first = endpoint_of(&tree, path);
        for _ in 0..10 {
            assert_eq!(endpoint_of(&tree, path), first, "path {path}");
        }
    }
}

#[test]
fn test_tree_is_shareable_across_threads() {
    let tree = Arc::new(tree_with(&[("/blog/<id:int>", "blog")]));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tree = Arc::clone(&tree);
            std::thread::spawn(move || {
                let path = format!("/blog/{i}");
                tree.lookup(&Method::GET, &path)
                    .into_match()
                    .and_then(|m| m.param("id").map(str::to_owned))
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(i.to_string()));
    }
}

#[test]
fn test_patterns_and_display() {
    let tree = tree_with(&[("/blog/list", "blog"), ("/blog/<id:int>", "post")]);
    assert_eq!(tree.patterns(), vec!["/blog/list", "/blog/<id:int>"]);
    let dump = tree.to_string();
    assert!(dump.contains("blog"));
    assert!(dump.contains("  list -> blog"));
    assert!(dump.contains("<id:int> -> post"));
}

#[test]
fn test_router_facade() {
    let router = Router::new(tree_with(&[("/blog/<id:int>", "blog")]));
    assert_eq!(router.len(), 1);
    assert!(router.route(&Method::GET, "/blog/1").is_match());
    assert!(matches!(router.route(&Method::GET, "/nope"), MatchResult::NotFound));
    assert!(matches!(
        router.route(&Method::GET, "/blog/../etc"),
        MatchResult::MalformedPath(_)
    ));
    assert_eq!(router.get_all_path_patterns(), vec!["/blog/<id:int>".to_string()]);
}
