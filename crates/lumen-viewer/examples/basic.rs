//! Example: Run a page's scripts and click a button
//!
//! `RUST_LOG=debug cargo run -p lumen-viewer --example basic`

use lumen_dom::Document;
use lumen_viewer::{Config, HitRegion, Page};
use tracing_subscriber::EnvFilter;

const SCRIPT: &str = r#"
    let title = document.querySelector('h1');
    title.textContent = 'Hello from script';
    title.style.color = 'steelblue';

    let button = document.getElementById('counter');
    button.addEventListener('click', function (event) {
        console.log('clicked', event.target.tagName);
        document.getElementById('status').textContent = 'clicked!';
    });
"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Build the document the parser would normally produce
    let mut doc = Document::new("html");
    let root = doc.root();
    let body = doc.append_element(root, "body")?;
    doc.append_element(body, "h1")?;
    let button = doc.append_element(body, "button")?;
    doc.tree_mut().set_attribute(button, "id", "counter")?;
    doc.tree_mut().set_text(button, "Click me")?;
    let status = doc.append_element(body, "p")?;
    doc.tree_mut().set_attribute(status, "id", "status")?;
    let script = doc.append_element(body, "script")?;
    doc.tree_mut().set_text(script, SCRIPT)?;

    let mut page = Page::new(doc, Config::default());
    let report = page.run_scripts()?;
    println!("Lumen Viewer v{}", lumen_viewer::VERSION);
    println!("Executed {} script block(s), {} failed", report.executed, report.failures.len());
    println!("Refresh pending: {}", page.take_refresh());

    // Layout would normally report these
    page.set_hit_regions(vec![HitRegion::new(10.0, 40.0, 110.0, 70.0, button)]);
    let outcome = page.click_at(50.0, 55.0)?;
    println!("Click invoked {} listener(s)", outcome.invoked);

    let status_text = page.document().borrow().tree().text(status)?.to_string();
    println!("Status: {status_text}");
    Ok(())
}
