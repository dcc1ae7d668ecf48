//! Page - A document with its script runtime
//!
//! Runs inline `<script>` blocks, keeps the "needs refresh" signal raised by
//! script mutations, and routes clicks from the rendered view to listeners.

use crate::hit::{HitRegion, hit_test};
use crate::{Config, ViewerError};
use lumen_dom::{Document, NodeId};
use lumen_script::{DispatchOutcome, Runtime, ScriptError, SharedDocument, Value};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Outcome of running a page's scripts
#[derive(Debug, Default)]
pub struct ScriptReport {
    /// Blocks that ran to completion
    pub executed: usize,
    /// Blocks that failed, by `<script>` node
    pub failures: Vec<(NodeId, ScriptError)>,
}

impl ScriptReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Change signals raised by the runtime
#[derive(Debug, Default)]
struct RefreshState {
    count: Cell<usize>,
    dirty: Cell<bool>,
}

impl RefreshState {
    fn signal(&self) {
        self.count.set(self.count.get() + 1);
        self.dirty.set(true);
    }
}

/// A loaded page
pub struct Page {
    document: SharedDocument,
    config: Config,
    runtime: Option<Runtime>,
    refresh: Rc<RefreshState>,
    regions: Vec<HitRegion>,
    scripts_executed: bool,
}

impl Page {
    /// Create a page over a freshly built document
    pub fn new(document: Document, config: Config) -> Self {
        Self::from_shared(Rc::new(RefCell::new(document)), config)
    }

    /// Create a page over a document the host keeps a handle to
    pub fn from_shared(document: SharedDocument, config: Config) -> Self {
        let refresh = Rc::new(RefreshState::default());
        let runtime = config.enable_javascript.then(|| {
            let signal = refresh.clone();
            Runtime::with_config(document.clone(), move || signal.signal(), config.script.clone())
        });
        tracing::info!(
            nodes = document.borrow().tree().len(),
            javascript = config.enable_javascript,
            "page created"
        );

        Self {
            document,
            config,
            runtime,
            refresh,
            regions: Vec::new(),
            scripts_executed: false,
        }
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runtime(&self) -> Option<&Runtime> {
        self.runtime.as_ref()
    }

    fn runtime_or_err(&self) -> Result<&Runtime, ViewerError> {
        self.runtime.as_ref().ok_or(ViewerError::ScriptingDisabled)
    }

    /// Run every non-empty `<script>` block once, in document order.
    ///
    /// A failing block is logged and recorded; later blocks still run.
    pub fn run_scripts(&mut self) -> Result<ScriptReport, ViewerError> {
        let runtime = self.runtime_or_err()?;
        if self.scripts_executed {
            tracing::debug!("scripts already executed");
            return Ok(ScriptReport::default());
        }

        let scripts: Vec<(NodeId, String)> = {
            let doc = self.document.borrow();
            doc.elements_by_tag("script")
                .into_iter()
                .filter_map(|id| {
                    let text = doc.tree().text(id).ok()?;
                    (!text.trim().is_empty()).then(|| (id, text.to_string()))
                })
                .collect()
        };
        tracing::info!("Running {} script block(s)", scripts.len());

        let mut report = ScriptReport::default();
        for (node, source) in scripts {
            match runtime.execute(&source) {
                Ok(_) => report.executed += 1,
                Err(err) => {
                    tracing::warn!(script = %node, "script failed: {}", err);
                    report.failures.push((node, err));
                }
            }
        }

        self.scripts_executed = true;
        Ok(report)
    }

    /// Evaluate ad-hoc source in the page's global scope
    pub fn execute(&self, source: &str) -> Result<Value, ViewerError> {
        Ok(self.runtime_or_err()?.execute(source)?)
    }

    /// Change signals received so far
    pub fn refresh_count(&self) -> usize {
        self.refresh.count.get()
    }

    pub fn needs_refresh(&self) -> bool {
        self.refresh.dirty.get()
    }

    /// Consume the dirty flag; true if the view must be re-laid out
    pub fn take_refresh(&self) -> bool {
        self.refresh.dirty.replace(false)
    }

    /// Replace the rendered regions, typically after each relayout
    pub fn set_hit_regions(&mut self, regions: Vec<HitRegion>) {
        self.regions = regions;
    }

    pub fn hit_regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        hit_test(&self.regions, x, y)
    }

    /// Dispatch `click` to the element under the point
    pub fn click_at(&self, x: f32, y: f32) -> Result<DispatchOutcome, ViewerError> {
        let node = self.hit_test(x, y).ok_or(ViewerError::NoTarget { x, y })?;
        self.click(node)
    }

    /// Dispatch `click` to a node
    pub fn click(&self, node: NodeId) -> Result<DispatchOutcome, ViewerError> {
        let runtime = self.runtime_or_err()?;
        if !self.document.borrow().is_connected(node) {
            return Err(ViewerError::Disconnected(node));
        }
        Ok(runtime.dispatch("click", node))
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("config", &self.config)
            .field("has_runtime", &self.runtime.is_some())
            .field("refresh_count", &self.refresh_count())
            .field("regions", &self.regions.len())
            .field("scripts_executed", &self.scripts_executed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_script(source: &str) -> Page {
        let mut doc = Document::new("html");
        let root = doc.root();
        let p = doc.append_element(root, "p").unwrap();
        doc.tree_mut().set_attribute(p, "id", "out").unwrap();
        let script = doc.append_element(root, "script").unwrap();
        doc.tree_mut().set_text(script, source).unwrap();
        Page::new(doc, Config::default())
    }

    #[test]
    fn test_take_refresh_consumes_flag() {
        let mut page = page_with_script("document.getElementById('out').textContent = 'x'");
        assert!(!page.needs_refresh());
        page.run_scripts().unwrap();
        assert_eq!(page.refresh_count(), 1);
        assert!(page.take_refresh());
        assert!(!page.take_refresh());
        assert_eq!(page.refresh_count(), 1);
    }

    #[test]
    fn test_scripts_run_once() {
        let mut page = page_with_script("document.getElementById('out').textContent = 'x'");
        assert_eq!(page.run_scripts().unwrap().executed, 1);
        assert_eq!(page.run_scripts().unwrap().executed, 0);
        assert_eq!(page.refresh_count(), 1);
    }

    #[test]
    fn test_disabled_javascript() {
        let doc = Document::new("html");
        let mut page = Page::new(doc, Config { enable_javascript: false, ..Config::default() });
        assert!(page.runtime().is_none());
        assert!(matches!(page.run_scripts(), Err(ViewerError::ScriptingDisabled)));
        assert!(matches!(page.execute("1"), Err(ViewerError::ScriptingDisabled)));
    }
}
