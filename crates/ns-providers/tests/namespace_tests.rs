//! Integration tests: memory and directory providers overlaid in one tree.

use nsroute_core::{Entity, MountTable, NsPath, Provider};
use nsroute_providers::{
    DirectoryProvider, FsResource, MemoryEntry, MemoryProvider, ResourceKind, build_tree,
};
use nsroute_tree::NamespaceTree;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn content_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("pages")).unwrap();
    fs::write(dir.path().join("pages/home.html"), "<h1>home</h1>").unwrap();
    fs::write(dir.path().join("robots.txt"), "User-agent: *").unwrap();
    dir
}

fn source(entity: &Entity) -> String {
    let payload = entity.payload().unwrap();
    if let Some(entry) = payload.downcast_ref::<MemoryEntry>() {
        entry.source().to_string()
    } else if let Some(resource) = payload.downcast_ref::<FsResource>() {
        format!("disk:{}", resource.kind().as_str())
    } else {
        "unknown".to_string()
    }
}

fn listing(tree: &NamespaceTree, path: &str) -> Vec<(String, bool)> {
    let parent = tree.resolve_str(path).unwrap().unwrap();
    tree.list_children(&parent)
        .map(|child| {
            let child = child.unwrap();
            (child.path().to_string(), child.is_concrete())
        })
        .collect()
}

#[test]
fn test_directory_overlays_memory_root() {
    let dir = content_dir();
    let root = MemoryProvider::builder()
        .name("site")
        .entry("/index.html", "<html/>")
        .entry("/content/robots.txt", "shadowed")
        .entry("/apps/sling/html.js", "render()")
        .build()
        .unwrap();

    let tree = NamespaceTree::new(Arc::new(root));
    tree.mount(
        "/content",
        Arc::new(DirectoryProvider::new(
            "disk",
            NsPath::new("/content").unwrap(),
            dir.path(),
        )),
    )
    .unwrap();

    let robots = tree.resolve_str("/content/robots.txt").unwrap().unwrap();
    assert_eq!(source(&robots), "disk:file");

    let pages = tree.resolve_str("/content/pages").unwrap().unwrap();
    assert_eq!(source(&pages), "disk:directory");

    let index = tree.resolve_str("/index.html").unwrap().unwrap();
    assert_eq!(source(&index), "site");

    assert!(tree.resolve_str("/apps/sling").unwrap().unwrap().is_synthetic());
    assert!(tree.resolve_str("/apps/other").unwrap().is_none());
}

#[test]
fn test_listed_children_resolve_through_tree() {
    let root = MemoryProvider::builder()
        .name("site")
        .entry("/apps/a.js", "a")
        .entry("/apps/sling/deep/b.js", "b")
        .build()
        .unwrap();
    let tree = NamespaceTree::new(Arc::new(root));

    let mut pending = vec![tree.resolve_str("/").unwrap().unwrap()];
    let mut visited = 0;
    while let Some(parent) = pending.pop() {
        for child in tree.list_children(&parent) {
            let child = child.unwrap();
            let resolved = tree
                .resolve(child.path())
                .unwrap()
                .unwrap_or_else(|| panic!("{} is listed but does not resolve", child.path()));
            assert_eq!(resolved.is_concrete(), child.is_concrete());
            visited += 1;
            pending.push(resolved);
        }
    }
    assert_eq!(visited, 5);
}

#[test]
fn test_root_listing_merges_memory_and_mounts() {
    let dir = content_dir();
    let root = MemoryProvider::builder()
        .entry("/index.html", "<html/>")
        .entry("/apps/sling/html.js", "render()")
        .build()
        .unwrap();

    let tree = NamespaceTree::new(Arc::new(root));
    tree.mount(
        "/content",
        Arc::new(DirectoryProvider::new(
            "disk",
            NsPath::new("/content").unwrap(),
            dir.path(),
        )),
    )
    .unwrap();

    assert_eq!(
        listing(&tree, "/"),
        vec![
            ("/index.html".to_string(), true),
            ("/apps".to_string(), false),
            ("/content".to_string(), false),
        ]
    );
    assert_eq!(
        listing(&tree, "/content"),
        vec![
            ("/content/pages".to_string(), true),
            ("/content/robots.txt".to_string(), true),
        ]
    );
}

#[test]
fn test_build_tree_from_loaded_table() {
    let dir = content_dir();
    let config = dir.path().join("mounts.toml");
    fs::write(
        &config,
        r#"
        [[mount]]
        path = "/"
        provider = { kind = "memory", name = "site", entries = { "/about.txt" = "about" } }

        [[mount]]
        path = "/content"
        provider = { kind = "directory", name = "disk", root = "pages" }
        "#,
    )
    .unwrap();

    let table = MountTable::load(&config).unwrap();
    let tree = build_tree(&table).unwrap();

    let home = tree.resolve_str("/content/home.html").unwrap().unwrap();
    let resource = home.payload().unwrap().downcast_ref::<FsResource>().unwrap();
    assert_eq!(resource.kind(), ResourceKind::File);
    assert_eq!(resource.file(), dir.path().join("pages").join("home.html"));

    let mounts: Vec<_> = tree
        .mounts()
        .into_iter()
        .map(|m| (m.path.to_string(), m.provider))
        .collect();
    assert_eq!(
        mounts,
        vec![
            ("/".to_string(), "site".to_string()),
            ("/content".to_string(), "disk".to_string()),
        ]
    );
}

#[test]
fn test_register_multi_root_memory_provider() {
    let tree = NamespaceTree::new(Arc::new(MemoryProvider::empty("root")));
    let scripts: Arc<dyn Provider> = Arc::new(
        MemoryProvider::builder()
            .name("scripts")
            .root("/apps")
            .root("/libs")
            .entry("/apps/a.js", "a")
            .entry("/libs/b.js", "b")
            .build()
            .unwrap(),
    );

    tree.register(Arc::clone(&scripts)).unwrap();
    assert!(tree.resolve_str("/apps/a.js").unwrap().unwrap().is_concrete());
    assert!(tree.resolve_str("/libs/b.js").unwrap().unwrap().is_concrete());

    assert_eq!(tree.unregister(&scripts), 2);
    assert!(tree.resolve_str("/apps/a.js").unwrap().is_none());
}
