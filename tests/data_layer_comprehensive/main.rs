//! End-to-end tests over the public quill API
//!
//! Exercises the full path a presentation layer would take: open the store
//! through a context, seed it from the gateway, drive the entity stores, and
//! verify the durable state across reopen.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use quill::{
    Context, Database, Error, GatewayClient, GatewayConfig, Post, PostDraft, PostStore,
    QuickAction, SeedSource, StoreConfig, Workspace, WorkspaceDraft, WorkspaceStore,
    DEFAULT_WORKSPACE_ID,
};
use tempfile::TempDir;

/// Canned HTTP endpoint answering `requests` generation calls in sequence.
fn stub_endpoint(responses: Vec<&'static str>) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/api/ai", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        for body in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text
                        .lines()
                        .find_map(|line| {
                            line.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
    });

    (endpoint, handle)
}

fn gateway(endpoint: &str) -> GatewayClient {
    GatewayClient::new(GatewayConfig {
        endpoint: endpoint.to_string(),
        api_key: Some("test-key".to_string()),
        model: GatewayConfig::DEFAULT_MODEL.to_string(),
    })
}

struct FixedSeed;

impl SeedSource for FixedSeed {
    fn generate_seed_post(&self) -> quill::Result<(String, String)> {
        Ok(("Seeded".to_string(), "<p>seed</p>".to_string()))
    }
}

#[test]
fn test_initialize_twice_yields_one_default_workspace() {
    let db = Database::in_memory().unwrap();
    db.initialize(&FixedSeed).unwrap();
    db.initialize(&FixedSeed).unwrap();

    let workspaces = db.list_workspaces().unwrap();
    let defaults: Vec<&Workspace> = workspaces
        .iter()
        .filter(|ws| ws.id == DEFAULT_WORKSPACE_ID)
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(workspaces.len(), 1);
}

#[test]
fn test_seeding_through_gateway_end_to_end() {
    let (endpoint, server) = stub_endpoint(vec![
        r#"{"content":"<p>first seed</p>"}"#,
        r#"{"content":"<p>second seed</p>"}"#,
    ]);

    let dir = TempDir::new().unwrap();
    let ctx = Context::new(StoreConfig::at(dir.path().join("blog.qsnp")));
    let db = ctx.open().unwrap();

    let client = gateway(&endpoint);
    db.initialize(&client).unwrap();
    server.join().unwrap();

    let posts = db.list_posts().unwrap();
    assert_eq!(posts.len(), 2);
    for post in &posts {
        assert_eq!(post.workspace_id, DEFAULT_WORKSPACE_ID);
        assert!(quill::BLOG_TOPICS.contains(&post.title.as_str()));
        assert!(post.content.contains("seed"));
    }

    // Seeds survive close/reopen and are not re-seeded
    ctx.close().unwrap();
    let db = ctx.open().unwrap();
    db.initialize(&FixedSeed).unwrap();
    assert_eq!(db.list_posts().unwrap().len(), 2);
}

#[test]
fn test_research_workspace_scenario() {
    let db = Arc::new(Database::in_memory().unwrap());

    // Create workspace: generated id, created == updated
    let research = db
        .create_workspace(WorkspaceDraft {
            name: "Research".to_string(),
            description: None,
        })
        .unwrap();
    assert!(!research.id.is_empty());
    assert_eq!(research.created_at, research.updated_at);

    // Create a post in it, visible through the index
    let draft = db
        .create_post(PostDraft {
            title: "Draft".to_string(),
            content: String::new(),
            workspace_id: research.id.clone(),
            tags: None,
        })
        .unwrap();
    let in_workspace = db.posts_by_workspace(&research.id).unwrap();
    assert_eq!(in_workspace.len(), 1);
    assert_eq!(in_workspace[0].id, draft.id);

    // Delete the workspace: the post moves to the default workspace
    db.delete_workspace(&research.id).unwrap();
    let moved = db.get_post(&draft.id).unwrap().unwrap();
    assert_eq!(moved.workspace_id, DEFAULT_WORKSPACE_ID);
    assert!(moved.updated_at >= draft.updated_at);
}

#[test]
fn test_entity_stores_over_durable_database() {
    let dir = TempDir::new().unwrap();
    let ctx = Context::new(StoreConfig::at(dir.path().join("blog.qsnp")));
    let db = ctx.open().unwrap();

    let workspaces = WorkspaceStore::new(Arc::clone(&db));
    let posts = PostStore::new(Arc::clone(&db));
    workspaces.fetch_all().unwrap();
    posts.fetch_all().unwrap();

    let research = workspaces
        .create(WorkspaceDraft {
            name: "Research".to_string(),
            description: Some("notes".to_string()),
        })
        .unwrap();
    let post = posts
        .create(PostDraft {
            title: "Draft".to_string(),
            content: "<p>body</p>".to_string(),
            workspace_id: research.id.clone(),
            tags: None,
        })
        .unwrap();

    // Workspace deletion reassigns durably; the post cache lags until
    // explicitly re-fetched
    workspaces.delete(&research.id).unwrap();
    assert_eq!(posts.snapshot().posts[0].workspace_id, research.id);
    posts.fetch_by_workspace(DEFAULT_WORKSPACE_ID).unwrap();
    assert_eq!(posts.snapshot().posts[0].workspace_id, DEFAULT_WORKSPACE_ID);

    // Everything lands on disk
    ctx.close().unwrap();
    let db = ctx.open().unwrap();
    let reloaded = db.get_post(&post.id).unwrap().unwrap();
    assert_eq!(reloaded.workspace_id, DEFAULT_WORKSPACE_ID);
    assert_eq!(reloaded.content, "<p>body</p>");
    assert!(db.get_workspace(&research.id).unwrap().is_none());
}

#[test]
fn test_full_upsert_discards_omitted_fields() {
    let db = Database::in_memory().unwrap();
    let post = db
        .create_post(PostDraft {
            title: "Tagged".to_string(),
            content: "<p>original</p>".to_string(),
            workspace_id: DEFAULT_WORKSPACE_ID.to_string(),
            tags: Some(vec!["rust".to_string()]),
        })
        .unwrap();

    // Caller's record omits tags and content; nothing is preserved for them
    db.update_post(Post {
        content: String::new(),
        tags: None,
        ..post.clone()
    })
    .unwrap();

    let stored = db.get_post(&post.id).unwrap().unwrap();
    assert!(stored.content.is_empty());
    assert!(stored.tags.is_none());
    assert_eq!(stored.title, "Tagged");
}

#[test]
fn test_gateway_error_taxonomy_distinctions() {
    // Empty prompt: rejected before any connection is attempted
    let client = gateway("http://127.0.0.1:1/api/ai");
    assert!(matches!(client.generate("", None), Err(Error::EmptyPrompt)));

    // Missing credential: configuration error, distinct message
    let unconfigured = GatewayClient::new(GatewayConfig {
        endpoint: "http://127.0.0.1:1/api/ai".to_string(),
        api_key: None,
        model: GatewayConfig::DEFAULT_MODEL.to_string(),
    });
    let config_err = unconfigured.generate("prompt", None).unwrap_err();
    assert!(matches!(config_err, Error::MissingCredential));

    // Transport failure: generic provider error
    let transport_err = client.generate("prompt", None).unwrap_err();
    assert!(matches!(transport_err, Error::Provider(_)));
    assert_ne!(config_err.to_string(), transport_err.to_string());
}

#[test]
fn test_quick_action_round_trip() {
    let (endpoint, server) = stub_endpoint(vec![r#"{"content":"<h2>Summary</h2>"}"#]);
    let client = gateway(&endpoint);

    let content = client
        .quick_action(QuickAction::Summarize, "a long document body")
        .unwrap();
    assert_eq!(content, "<h2>Summary</h2>");
    server.join().unwrap();
}
