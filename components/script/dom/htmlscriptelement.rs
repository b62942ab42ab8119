/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::cell::Cell;
use std::rc::{Rc, Weak};

use embedder_traits::{ExternalScript, InlineScript, ScriptError};
use html5ever::local_name;

use crate::dom::attr::Attr;
use crate::dom::bindings::str::{DOMString, HTML_SPACE_CHARACTERS};
use crate::dom::document::Document;
use crate::dom::element::{AttributeMutation, ElementCreator};
use crate::dom::node::{BindContext, ChildrenMutation, CloneChildrenFlag, Node};
use crate::dom::virtualmethods::VirtualMethods;

/// Supported script types as defined by
/// <https://html.spec.whatwg.org/multipage/#javascript-mime-type>.
pub static SCRIPT_JS_MIMES: &[&str] = &[
    "application/ecmascript",
    "application/javascript",
    "application/x-ecmascript",
    "application/x-javascript",
    "text/ecmascript",
    "text/javascript",
    "text/javascript1.0",
    "text/javascript1.1",
    "text/javascript1.2",
    "text/javascript1.3",
    "text/javascript1.4",
    "text/javascript1.5",
    "text/jscript",
    "text/livescript",
    "text/x-ecmascript",
    "text/x-javascript",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScriptType {
    Classic,
    Module,
}

/// What a `prepare` call did. Triggers discard this; it exists so callers
/// that need to know *why* nothing happened can tell the no-op cases apart.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrepareOutcome {
    AlreadyStarted,
    NothingToExecute,
    NotConnected,
    NonClassicType,
    DispatchedExternal,
    DispatchedInline,
}

pub struct HTMLScriptElement {
    /// The element node this state hangs off.
    node: Weak<Node>,

    /// <https://html.spec.whatwg.org/multipage/#already-started>
    already_started: Cell<bool>,

    /// <https://html.spec.whatwg.org/multipage/#parser-inserted>
    parser_inserted: Cell<bool>,

    /// Set while a fragment re-parse relocates this node; the attachment
    /// trigger must run during the move even for parser-inserted scripts.
    moving_due_to_reparse: Cell<bool>,

    /// Line the parser saw this element on.
    line_number: u64,
}

impl HTMLScriptElement {
    pub(crate) fn new_inherited(node: Weak<Node>, creator: ElementCreator) -> HTMLScriptElement {
        HTMLScriptElement {
            node,
            already_started: Cell::new(false),
            parser_inserted: Cell::new(creator.is_parser_created()),
            moving_due_to_reparse: Cell::new(false),
            line_number: creator.return_line_number(),
        }
    }

    pub fn already_started(&self) -> bool {
        self.already_started.get()
    }

    pub fn parser_inserted(&self) -> bool {
        self.parser_inserted.get()
    }

    /// Flags a node being relocated by a fragment re-parse, so that the
    /// reattachment runs the gate even though the parser created this
    /// element.
    pub fn set_moving_due_to_reparse(&self, moving: bool) {
        self.moving_due_to_reparse.set(moving);
    }

    /// Parser-pop trigger: the parser finished consuming this element's
    /// subtree and removed it from its stack of open elements, so the
    /// element's final content is known.
    pub fn popped_off_stack_of_open_elements(&self) {
        self.prepare();
    }

    /// <https://html.spec.whatwg.org/multipage/#prepare-a-script>, reduced:
    /// this gate only decides *when* a classic script is handed to the
    /// dispatcher. Scheduling (async/defer), modules, and the full fetch
    /// pipeline stay with the embedder.
    pub fn prepare(&self) -> PrepareOutcome {
        // Step 1.
        if self.already_started.get() {
            return PrepareOutcome::AlreadyStarted;
        }

        let Some(node) = self.node.upgrade() else {
            return PrepareOutcome::NotConnected;
        };

        // Step 2: neither a src attribute nor text means nothing to run.
        // Only child *text* is considered; whether child element nodes
        // should count as content is unsettled upstream:
        // https://github.com/whatwg/html/issues/3419
        let text = node.child_text_content();
        let has_src = node.has_attribute(&local_name!("src"));
        if text.is_empty() && !has_src {
            return PrepareOutcome::NothingToExecute;
        }

        // Step 3.
        if !node.is_connected() {
            return PrepareOutcome::NotConnected;
        }

        // Step 4: only classic scripts are ever dispatched here. Module and
        // unrecognized types bail before the flag commits, so a later
        // retype can still start this element.
        match self.script_type() {
            Some(ScriptType::Classic) => {},
            Some(ScriptType::Module) | None => {
                debug!("script type not classic, skipping dispatch");
                return PrepareOutcome::NonClassicType;
            },
        }

        // Step 5: commit point. Every subsequent call short-circuits above,
        // whether or not the dispatcher below does anything.
        self.already_started.set(true);

        // Step 6.
        if has_src {
            self.fetch_external_script(&node);
            PrepareOutcome::DispatchedExternal
        } else {
            self.fetch_internal_script(&node, text);
            PrepareOutcome::DispatchedInline
        }
    }

    /// External-script dispatch bridge. The scripting-permission predicate
    /// belongs to this side of the handoff, not to the gate's decision
    /// sequence.
    fn fetch_external_script(&self, node: &Rc<Node>) {
        let Some(doc) = node.owner_document() else {
            return;
        };
        if !doc.is_scripting_enabled() {
            return;
        }
        let Some(attr) = node.get_attribute(&local_name!("src")) else {
            return;
        };
        let src = attr.value().clone();
        if src.is_empty() {
            doc.report_script_error(&ScriptError::Fetch("empty src attribute".to_owned()));
            return;
        }
        let url = match doc.base_url().join(&src) {
            Ok(url) => url,
            Err(error) => {
                warn!("error parsing URL for script {}", src);
                doc.report_script_error(&ScriptError::Fetch(format!(
                    "invalid src attribute {}: {}",
                    src, error
                )));
                return;
            },
        };
        doc.dispatcher().dispatch_external_script(ExternalScript {
            url,
            line_number: self.line_number,
        });
    }

    /// Internal-script dispatch bridge.
    fn fetch_internal_script(&self, node: &Rc<Node>, text: DOMString) {
        let Some(doc) = node.owner_document() else {
            return;
        };
        if !doc.is_scripting_enabled() {
            return;
        }
        doc.dispatcher().dispatch_inline_script(InlineScript {
            text: String::from(text),
            base_url: doc.base_url().clone(),
            line_number: self.line_number,
        });
    }

    /// Resolve the `type`/`language` attribute pair of this element.
    /// `None` means the type is unrecognized and the script never runs.
    pub fn script_type(&self) -> Option<ScriptType> {
        let node = self.node.upgrade()?;
        let type_attr = node.get_attribute(&local_name!("type"));
        let language_attr = node.get_attribute(&local_name!("language"));
        let type_value = type_attr.map(|attr| attr.value().clone());
        let language_value = language_attr.map(|attr| attr.value().clone());
        script_type_from_attributes(type_value.as_deref(), language_value.as_deref())
    }

    /// <https://html.spec.whatwg.org/multipage/#dom-script-text>
    pub fn text(&self) -> DOMString {
        match self.node.upgrade() {
            Some(node) => node.child_text_content(),
            None => DOMString::new(),
        }
    }

    /// <https://html.spec.whatwg.org/multipage/#dom-script-text>
    pub fn set_text(&self, value: DOMString) {
        if let Some(node) = self.node.upgrade() {
            node.set_text_content(value);
        }
    }
}

/// Classification of the `type`/`language` attribute pair. The check is a
/// string-exact membership test against the fixed table above: a structured
/// MIME parse would strip characters the comparison treats as significant.
pub fn script_type_from_attributes(
    type_attr: Option<&str>,
    language_attr: Option<&str>,
) -> Option<ScriptType> {
    match (type_attr, language_attr) {
        (Some(ty), _) if ty.is_empty() => {
            debug!("script type empty, inferring js");
            Some(ScriptType::Classic)
        },
        (None, Some(lang)) if lang.is_empty() => {
            debug!("script language empty, inferring js");
            Some(ScriptType::Classic)
        },
        (None, None) => Some(ScriptType::Classic),
        (Some(ty), _) => {
            debug!("script type={}", ty);
            let ty = ty.to_ascii_lowercase();
            let ty = ty.trim_matches(HTML_SPACE_CHARACTERS);
            if ty == "module" {
                return Some(ScriptType::Module);
            }
            if SCRIPT_JS_MIMES.contains(&ty) {
                Some(ScriptType::Classic)
            } else {
                None
            }
        },
        (None, Some(lang)) => {
            debug!("script language={}", lang);
            let language = format!("text/{}", lang);
            if SCRIPT_JS_MIMES.contains(&language.to_ascii_lowercase().as_str()) {
                Some(ScriptType::Classic)
            } else {
                None
            }
        },
    }
}

impl VirtualMethods for HTMLScriptElement {
    fn attribute_mutated(&self, attr: &Attr, mutation: AttributeMutation) {
        // A src attribute appearing on a script that has not started yet
        // begins the external fetch early; only `prepare` may flip the
        // started flag.
        if *attr.local_name() != local_name!("src") {
            return;
        }
        if let AttributeMutation::Set(None) = mutation {
            if !self.already_started.get() && !attr.value().is_empty() {
                if let Some(node) = self.node.upgrade() {
                    self.fetch_external_script(&node);
                }
            }
        }
    }

    fn children_changed(&self, _mutation: &ChildrenMutation) {
        let Some(node) = self.node.upgrade() else {
            return;
        };
        if !self.parser_inserted.get() && node.is_connected() {
            self.prepare();
        }
    }

    fn bind_to_tree(&self, context: &BindContext) {
        // Parser-inserted scripts wait for the parser-pop trigger instead,
        // so their final content is known; a re-parse move is the one case
        // where attachment must run the gate anyway.
        if context.tree_connected &&
            (!self.parser_inserted.get() || self.moving_due_to_reparse.get())
        {
            self.prepare();
        }
    }

    fn cloning_steps(
        &self,
        copy: &Rc<Node>,
        _maybe_doc: Option<&Rc<Document>>,
        _clone_children: CloneChildrenFlag,
    ) {
        // <https://html.spec.whatwg.org/multipage/#already-started>
        if self.already_started.get() {
            if let Some(script) = copy.as_script() {
                script.already_started.set(true);
            }
        }
    }
}
