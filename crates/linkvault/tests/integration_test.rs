//! End-to-end command tests against temporary vaults

use linkvault::cli::{Command, GraphCommand, GraphLimits, IndexCommand, LinksCommand, SearchArgs};
use linkvault::{App, render_error, render_success};
use linkvault_core::error::exit;
use linkvault_core::{EngineMode, LinkvaultConfig};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;
use tokio::fs;
use tokio_util::sync::CancellationToken;

async fn create_test_vault(notes: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for (path, body) in notes {
        write_note(temp_dir.path(), path, body).await;
    }
    temp_dir
}

async fn write_note(root: &Path, path: &str, body: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).await.unwrap();
    }
    fs::write(full, body).await.unwrap();
}

fn app(root: &Path) -> App {
    let mut config = LinkvaultConfig::default();
    config.vault = Some(root.to_path_buf());
    config.search.engine = EngineMode::Native;
    App::new(config).unwrap()
}

fn text_search(text: &str) -> SearchArgs {
    SearchArgs {
        text: Some(text.to_string()),
        ..Default::default()
    }
}

async fn run(app: &App, command: Command) -> linkvault_core::Result<Value> {
    let output = app.run(&command, &CancellationToken::new()).await?;
    let rendered = render_success(&output, true)?;
    let envelope: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(envelope["ok"], true);
    Ok(envelope["data"].clone())
}

#[tokio::test]
async fn test_search_json_envelope() {
    let vault = create_test_vault(&[
        ("a.md", "nothing here\nthe Needle line\n"),
        ("notes/b.md", "another needle\n"),
        ("c.md", "no match\n"),
    ])
    .await;
    let app = app(vault.path());

    let data = run(&app, Command::Search(text_search("needle"))).await.unwrap();
    let results = data.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["path"], "a.md");
    assert_eq!(results[0]["line"], 2);
    assert_eq!(results[0]["match_type"], "text");
    assert_eq!(results[1]["path"], "notes/b.md");

    let args = SearchArgs {
        path: "notes".to_string(),
        ..text_search("needle")
    };
    let data = run(&app, Command::Search(args)).await.unwrap();
    assert_eq!(data.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_with_meta_reports_limit_warning() {
    let vault = create_test_vault(&[("a.md", "needle\n"), ("b.md", "needle\n")]).await;
    let app = app(vault.path());

    let args = SearchArgs {
        limit: Some(1),
        with_meta: true,
        ..text_search("needle")
    };
    let data = run(&app, Command::Search(args)).await.unwrap();
    assert_eq!(data["results"].as_array().unwrap().len(), 1);
    assert_eq!(data["metadata"]["truncated"], true);
    assert_eq!(data["metadata"]["cache_status"], "on_demand");
    assert!(data["metadata"]["source_file_mtime_max"].is_string());
    assert_eq!(
        data["warnings"][0],
        "result limit reached; output may be truncated"
    );

    let args = SearchArgs {
        with_meta: true,
        ..text_search("needle")
    };
    let data = run(&app, Command::Search(args)).await.unwrap();
    assert_eq!(data["metadata"]["truncated"], false);
    assert!(data["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_strict_fails_on_truncation() {
    let vault = create_test_vault(&[("a.md", "needle\n"), ("b.md", "needle\n")]).await;
    let app = app(vault.path());

    let args = SearchArgs {
        limit: Some(1),
        strict: true,
        ..text_search("needle")
    };
    let err = run(&app, Command::Search(args)).await.unwrap_err();
    assert_eq!(err.exit_code(), exit::VALIDATION);

    let envelope: Value = serde_json::from_str(&render_error(&err, true)).unwrap();
    assert_eq!(envelope["ok"], false);
    assert_eq!(envelope["error"]["reason"], "strict_mode_violation");
    assert!(envelope["error"]["actionable_hint"].is_string());
}

#[tokio::test]
async fn test_search_rejects_bad_arguments() {
    let vault = create_test_vault(&[("a.md", "needle\n")]).await;
    let app = app(vault.path());

    let args = SearchArgs {
        max_chars: Some(0),
        ..text_search("needle")
    };
    let err = run(&app, Command::Search(args)).await.unwrap_err();
    assert!(err.to_string().contains("--max-chars must be > 0"));

    let args = SearchArgs {
        path: "../outside".to_string(),
        ..text_search("needle")
    };
    let err = run(&app, Command::Search(args)).await.unwrap_err();
    assert_eq!(err.exit_code(), exit::VALIDATION);

    let err = run(&app, Command::Search(SearchArgs::default()))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), exit::VALIDATION);
}

#[tokio::test]
async fn test_search_max_chars_caps_snippets() {
    let long = format!("{} needle {}\n", "x".repeat(200), "y".repeat(200));
    let vault = create_test_vault(&[("a.md", &long)]).await;
    let app = app(vault.path());

    let args = SearchArgs {
        max_chars: Some(20),
        ..text_search("needle")
    };
    let data = run(&app, Command::Search(args)).await.unwrap();
    let snippet = data[0]["snippet"].as_str().unwrap();
    assert!(snippet.chars().count() <= 21);
}

#[tokio::test]
async fn test_tag_and_prop_search() {
    let vault = create_test_vault(&[
        ("a.md", "---\ntags: [project]\nstatus: Done\n---\nbody\n"),
        ("b.md", "inline #project tag\n"),
        ("c.md", "---\nstatus: open\n---\n"),
    ])
    .await;
    let app = app(vault.path());

    let args = SearchArgs {
        tag: "#project".to_string(),
        ..Default::default()
    };
    let data = run(&app, Command::Search(args)).await.unwrap();
    let paths: Vec<&str> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["a.md", "b.md"]);
    assert_eq!(data[0]["match_type"], "tag");

    let args = SearchArgs {
        prop: "status=done".to_string(),
        ..Default::default()
    };
    let data = run(&app, Command::Search(args)).await.unwrap();
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["path"], "a.md");
    assert_eq!(data[0]["match"], "status=Done");
}

#[tokio::test]
async fn test_links_outgoing_and_missing_note() {
    let vault = create_test_vault(&[("a.md", "see [[b]] and [[c|alias]]\n"), ("b.md", "")]).await;
    let app = app(vault.path());

    let data = run(
        &app,
        Command::Links(LinksCommand::Outgoing {
            path: "a.md".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(data, serde_json::json!(["b", "c"]));

    let err = run(
        &app,
        Command::Links(LinksCommand::Outgoing {
            path: "missing.md".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.exit_code(), exit::NOT_FOUND);
    assert_eq!(render_error(&err, false), "error: note not found: missing.md");
}

#[tokio::test]
async fn test_backlinks_cache_is_rebuilt_only_on_request() {
    let vault = create_test_vault(&[("a.md", "[[b]]\n"), ("b.md", "")]).await;
    let app = app(vault.path());
    let backlinks = |index: bool| {
        Command::Links(LinksCommand::Backlinks {
            path: "b.md".to_string(),
            index,
        })
    };

    let data = run(&app, backlinks(false)).await.unwrap();
    assert_eq!(data, serde_json::json!(["a.md"]));

    write_note(vault.path(), "notes/c.md", "also [[b]]\n").await;
    let data = run(&app, backlinks(false)).await.unwrap();
    assert_eq!(data, serde_json::json!(["a.md"]));

    let data = run(&app, backlinks(true)).await.unwrap();
    assert_eq!(data, serde_json::json!(["a.md", "notes/c.md"]));
}

#[tokio::test]
async fn test_graph_neighborhood() {
    let vault = create_test_vault(&[("a.md", "[[b]]"), ("b.md", "")]).await;
    let app = app(vault.path());

    let data = run(
        &app,
        Command::Graph(GraphCommand::Neighborhood {
            path: "a".to_string(),
            limits: GraphLimits::default(),
        }),
    )
    .await
    .unwrap();

    let nodes: Vec<&str> = data["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["path"].as_str().unwrap())
        .collect();
    assert_eq!(nodes, vec!["a.md", "b.md"]);
    assert_eq!(data["nodes"][0]["is_seed"], true);
    assert_eq!(
        data["edges"],
        serde_json::json!([{"from": "a.md", "to": "b.md", "kind": "links_to"}])
    );
    assert_eq!(data["metadata"]["cache_status"], "backlinks_in_memory_auto");
    assert_eq!(data["metadata"]["truncated"], false);
    assert!(data.get("warnings").is_none());
    assert!(data.get("query").is_none());
}

#[tokio::test]
async fn test_graph_node_limit_strict_and_lenient() {
    let vault = create_test_vault(&[("a.md", "[[b]] [[c]]"), ("b.md", ""), ("c.md", "")]).await;
    let app = app(vault.path());
    let neighborhood = |strict: bool| {
        Command::Graph(GraphCommand::Neighborhood {
            path: "a.md".to_string(),
            limits: GraphLimits {
                depth: Some(1),
                node_limit: Some(2),
                strict,
            },
        })
    };

    let data = run(&app, neighborhood(false)).await.unwrap();
    assert_eq!(data["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(data["metadata"]["truncated"], true);
    assert_eq!(data["warnings"][0], "node limit reached; graph truncated");

    let err = run(&app, neighborhood(true)).await.unwrap_err();
    assert_eq!(err.exit_code(), exit::VALIDATION);
    assert_eq!(err.reason(), "strict_mode_violation");
}

#[tokio::test]
async fn test_graph_context_seeds_from_search() {
    let vault = create_test_vault(&[
        ("a.md", "alpha topic [[b]]\n"),
        ("b.md", "plain\n"),
        ("c.md", "alpha again\n"),
    ])
    .await;
    let app = app(vault.path());

    let data = run(
        &app,
        Command::Graph(GraphCommand::Context {
            query: "alpha".to_string(),
            seed_limit: None,
            path: String::new(),
            case_sensitive: false,
            limits: GraphLimits::default(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(data["query"], "alpha");
    assert_eq!(data["seeds"].as_array().unwrap().len(), 2);
    let seeds: Vec<&str> = data["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["is_seed"] == true)
        .map(|n| n["path"].as_str().unwrap())
        .collect();
    assert_eq!(seeds.len(), 2);
    assert!(seeds.contains(&"a.md") && seeds.contains(&"c.md"));
    assert!(
        data["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["path"] == "b.md" && n["is_seed"] == false)
    );
}

#[tokio::test]
async fn test_index_build_stats() {
    let vault = create_test_vault(&[
        ("a.md", "[[b]] [[c]]"),
        ("b.md", "[[a]]"),
        (".hidden/x.md", "[[a]]"),
    ])
    .await;
    let app = app(vault.path());

    let output = app
        .run(&Command::Index(IndexCommand::Build), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(output.data["stats"]["documents"], 2);
    assert_eq!(output.data["stats"]["links"], 3);
    assert_eq!(output.data["cache_status"], "built");
    assert!(output.data["built_at"].is_string());
    assert_eq!(output.lines[0], "documents: 2 links: 3 targets: 3");
}

#[tokio::test]
async fn test_cancelled_search() {
    let vault = create_test_vault(&[("a.md", "needle\n")]).await;
    let app = app(vault.path());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = app
        .run(&Command::Search(text_search("needle")), &cancel)
        .await;
    assert!(result.is_err());
}
