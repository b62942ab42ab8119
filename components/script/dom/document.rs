/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use embedder_traits::{
    LogErrorReporter, NullScriptDispatcher, RunScripts, ScriptDispatcher, ScriptError,
    ScriptErrorReporter,
};
use html5ever::LocalName;
use url::Url;

use crate::dom::bindings::str::DOMString;
use crate::dom::element::ElementCreator;
use crate::dom::node::Node;
use crate::dom::window::Window;

/// The owner of a node tree: root container, base URL, scripting policy,
/// and the embedder hooks scripts are handed to.
pub struct Document {
    /// Back-reference to the `Rc` this document lives in, handed to the
    /// nodes it creates.
    self_ref: Weak<Document>,
    node: Rc<Node>,
    base_url: Url,
    /// The default view; `None` means no browsing context.
    window: RefCell<Option<Rc<Window>>>,
    /// Document-level override that disables scripting even when the
    /// window would allow it.
    scripting_disabled: Cell<bool>,
    dispatcher: RefCell<Rc<dyn ScriptDispatcher>>,
    error_reporter: RefCell<Rc<dyn ScriptErrorReporter>>,
}

impl Document {
    pub fn new(base_url: Url) -> Rc<Document> {
        Rc::new_cyclic(|weak| Document {
            self_ref: weak.clone(),
            node: Node::new_document(weak.clone()),
            base_url,
            window: RefCell::new(None),
            scripting_disabled: Cell::new(false),
            dispatcher: RefCell::new(Rc::new(NullScriptDispatcher)),
            error_reporter: RefCell::new(Rc::new(LogErrorReporter)),
        })
    }

    /// The root container node of this document's tree.
    pub fn document_node(&self) -> &Rc<Node> {
        &self.node
    }

    /// <https://html.spec.whatwg.org/multipage/#document-base-url>
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn window(&self) -> Option<Rc<Window>> {
        self.window.borrow().clone()
    }

    pub fn set_window(&self, window: Option<Rc<Window>>) {
        *self.window.borrow_mut() = window;
    }

    pub fn set_scripting_disabled(&self, disabled: bool) {
        self.scripting_disabled.set(disabled);
    }

    /// <https://html.spec.whatwg.org/multipage/#enabling-and-disabling-scripting>
    ///
    /// Consulted by the dispatch bridges, never by the execution gate's own
    /// decision sequence.
    pub fn is_scripting_enabled(&self) -> bool {
        match &*self.window.borrow() {
            Some(window) => {
                window.run_scripts() == RunScripts::Dangerously && !self.scripting_disabled.get()
            },
            None => false,
        }
    }

    pub fn set_script_dispatcher(&self, dispatcher: Rc<dyn ScriptDispatcher>) {
        *self.dispatcher.borrow_mut() = dispatcher;
    }

    pub(crate) fn dispatcher(&self) -> Rc<dyn ScriptDispatcher> {
        self.dispatcher.borrow().clone()
    }

    pub fn set_script_error_reporter(&self, reporter: Rc<dyn ScriptErrorReporter>) {
        *self.error_reporter.borrow_mut() = reporter;
    }

    /// The generic script-error reporting channel. Dispatch implementations
    /// report post-dispatch failures here; nothing in the trigger call paths
    /// ever aborts because of them.
    pub fn report_script_error(&self, error: &ScriptError) {
        let reporter = self.error_reporter.borrow().clone();
        reporter.report_script_error(error);
    }

    pub fn create_element(&self, name: LocalName, creator: ElementCreator) -> Rc<Node> {
        Node::new_element(self.self_ref.clone(), name, creator)
    }

    pub fn create_text_node(&self, data: DOMString) -> Rc<Node> {
        Node::new_text(self.self_ref.clone(), data)
    }
}
