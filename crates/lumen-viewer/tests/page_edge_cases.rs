//! Page-level tests for lumen-viewer
//!
//! Script loading, refresh bookkeeping and click routing.

use lumen_dom::{Document, NodeId};
use lumen_script::{ScriptConfig, ScriptError};
use lumen_viewer::*;

struct Nodes {
    button: NodeId,
    output: NodeId,
}

/// `<html><body><button id="go"/><p id="out"/> scripts... </body></html>`
fn build(scripts: &[&str]) -> (Document, Nodes) {
    let mut doc = Document::new("html");
    let root = doc.root();
    let body = doc.append_element(root, "body").unwrap();
    let button = doc.append_element(body, "button").unwrap();
    doc.tree_mut().set_attribute(button, "id", "go").unwrap();
    let output = doc.append_element(body, "p").unwrap();
    doc.tree_mut().set_attribute(output, "id", "out").unwrap();
    for source in scripts {
        let script = doc.append_element(body, "script").unwrap();
        doc.tree_mut().set_text(script, *source).unwrap();
    }
    (doc, Nodes { button, output })
}

fn text(page: &Page, node: NodeId) -> String {
    page.document().borrow().tree().text(node).unwrap().to_string()
}

// ============================================================================
// SCRIPT LOADING
// ============================================================================

#[test]
fn test_blocks_run_in_document_order() {
    let (doc, nodes) = build(&[
        "let message = 'first'",
        "document.getElementById('out').textContent = message",
    ]);
    let mut page = Page::new(doc, Config::default());
    let report = page.run_scripts().unwrap();
    assert_eq!(report.executed, 2);
    assert!(report.is_ok());
    assert_eq!(text(&page, nodes.output), "first");
}

#[test]
fn test_failing_block_does_not_stop_the_rest() {
    let (doc, nodes) = build(&[
        "document.getElementById('missing').textContent = 'x'",
        "document.getElementById('out').textContent = 'second ran'",
    ]);
    let mut page = Page::new(doc, Config::default());
    let report = page.run_scripts().unwrap();
    assert_eq!(report.executed, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].1, ScriptError::Type(_)));
    assert_eq!(text(&page, nodes.output), "second ran");
}

#[test]
fn test_empty_script_blocks_are_skipped() {
    let (doc, _) = build(&["", "   \n  ", "let a = 1"]);
    let mut page = Page::new(doc, Config::default());
    let report = page.run_scripts().unwrap();
    assert_eq!(report.executed, 1);
    assert_eq!(page.refresh_count(), 0);
}

#[test]
fn test_syntax_error_is_reported_with_node() {
    let (doc, _) = build(&["if (x {"]);
    let mut page = Page::new(doc, Config::default());
    let script = page.document().borrow().query_selector("script").unwrap();
    let report = page.run_scripts().unwrap();
    assert_eq!(report.failures[0].0, script);
    assert!(report.failures[0].1.is_compile_error());
}

#[test]
fn test_deeply_nested_block_fails_alone() {
    let deep = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
    let (doc, nodes) = build(&[deep.as_str(), "document.getElementById('out').textContent = 'after'"]);
    let mut page = Page::new(doc, Config::default());
    let report = page.run_scripts().unwrap();
    assert_eq!(report.executed, 1);
    assert!(report.failures[0].1.is_compile_error());
    assert_eq!(text(&page, nodes.output), "after");
}

// ============================================================================
// REFRESH
// ============================================================================

#[test]
fn test_each_mutation_is_signalled() {
    let (doc, _) = build(&[
        "let out = document.getElementById('out'); out.textContent = 'a'; out.setAttribute('class', 'b'); out.style.color = 'red'",
    ]);
    let mut page = Page::new(doc, Config::default());
    page.run_scripts().unwrap();
    assert_eq!(page.refresh_count(), 3);
    assert!(page.take_refresh());
    assert!(!page.needs_refresh());
}

// ============================================================================
// CLICKS
// ============================================================================

#[test]
fn test_click_at_routes_to_listener() {
    let (doc, nodes) = build(&[
        "document.getElementById('go').addEventListener('click', function (e) { document.getElementById('out').textContent = 'clicked' })",
    ]);
    let mut page = Page::new(doc, Config::default());
    page.run_scripts().unwrap();
    page.set_hit_regions(vec![
        HitRegion::new(0.0, 0.0, 800.0, 600.0, nodes.output),
        HitRegion::new(10.0, 10.0, 90.0, 30.0, nodes.button),
    ]);

    let outcome = page.click_at(20.0, 20.0).unwrap();
    assert_eq!(outcome.target, nodes.button);
    assert_eq!(outcome.invoked, 1);
    assert!(outcome.is_ok());
    assert_eq!(text(&page, nodes.output), "clicked");
    assert_eq!(page.refresh_count(), 1);

    // the paragraph has no listeners
    let outcome = page.click_at(400.0, 400.0).unwrap();
    assert_eq!(outcome.target, nodes.output);
    assert_eq!(outcome.invoked, 0);
}

#[test]
fn test_click_outside_every_region() {
    let (doc, nodes) = build(&[]);
    let mut page = Page::new(doc, Config::default());
    page.set_hit_regions(vec![HitRegion::new(0.0, 0.0, 10.0, 10.0, nodes.button)]);
    assert!(matches!(page.click_at(50.0, 50.0), Err(ViewerError::NoTarget { .. })));
}

#[test]
fn test_click_on_removed_node() {
    let (doc, nodes) = build(&["document.getElementById('go').remove()"]);
    let mut page = Page::new(doc, Config::default());
    page.run_scripts().unwrap();
    assert!(matches!(page.click(nodes.button), Err(ViewerError::Disconnected(n)) if n == nodes.button));
}

#[test]
fn test_listener_errors_surface_in_outcome() {
    let (doc, nodes) = build(&[
        "let b = document.getElementById('go');
         b.addEventListener('click', function () { nope() });
         b.addEventListener('click', function () { document.getElementById('out').textContent = 'still ran' })",
    ]);
    let mut page = Page::new(doc, Config::default());
    page.run_scripts().unwrap();
    let outcome = page.click(nodes.button).unwrap();
    assert_eq!(outcome.invoked, 2);
    assert_eq!(outcome.errors, vec![ScriptError::UndefinedVariable("nope".into())]);
    assert_eq!(text(&page, nodes.output), "still ran");
}

#[test]
fn test_configured_call_depth() {
    let (doc, _) = build(&["let f = function () { f() }; f()"]);
    let config = Config { script: ScriptConfig { max_call_depth: 8, ..ScriptConfig::default() }, ..Config::default() };
    let mut page = Page::new(doc, config);
    let report = page.run_scripts().unwrap();
    assert_eq!(report.failures[0].1, ScriptError::CallDepthExceeded(8));
}
