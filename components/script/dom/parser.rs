/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The slice of a streaming HTML parser this crate models: element and text
//! insertion with parser-created provenance, the stack-of-open-elements pop
//! that tells a script its content is complete, and the re-parse relocation
//! used by document.write-style fragment handling. Tokenization and real
//! tree construction stay with the embedder.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use html5ever::LocalName;

use crate::dom::bindings::str::DOMString;
use crate::dom::document::Document;
use crate::dom::element::ElementCreator;
use crate::dom::node::Node;

pub struct Parser {
    document: Rc<Document>,
    /// Open script elements awaiting their end tag. Other element kinds
    /// have no pop behavior, so only scripts are tracked.
    stack: RefCell<Vec<Rc<Node>>>,
    /// Line the parser is currently consuming input on.
    current_line: Cell<u64>,
}

impl Parser {
    pub fn new(document: Rc<Document>) -> Parser {
        Parser {
            document,
            stack: RefCell::new(vec![]),
            current_line: Cell::new(1),
        }
    }

    pub fn document(&self) -> &Rc<Document> {
        &self.document
    }

    pub fn set_current_line(&self, line: u64) {
        self.current_line.set(line);
    }

    /// Creates an element for a start tag and inserts it under `parent`.
    /// Attributes are applied before insertion, with notifications, the way
    /// a streaming parser hands them over.
    pub fn insert_element(
        &self,
        parent: &Rc<Node>,
        name: LocalName,
        attrs: Vec<(LocalName, DOMString)>,
    ) -> Rc<Node> {
        let element = self
            .document
            .create_element(name, ElementCreator::ParserCreated(self.current_line.get()));
        for (name, value) in attrs {
            element.set_attribute(name, value);
        }
        parent.append_child(&element);
        if element.as_script().is_some() {
            self.stack.borrow_mut().push(element.clone());
        }
        element
    }

    /// Inserts a text token under `parent`.
    pub fn insert_text(&self, parent: &Rc<Node>, data: DOMString) -> Rc<Node> {
        let text = self.document.create_text_node(data);
        parent.append_child(&text);
        text
    }

    /// An end tag closed the topmost tracked element. Fires the script
    /// pop trigger: at this point the parser has consumed the element's
    /// whole subtree.
    pub fn pop(&self) -> Option<Rc<Node>> {
        let node = self.stack.borrow_mut().pop()?;
        if let Some(script) = node.as_script() {
            script.popped_off_stack_of_open_elements();
        }
        Some(node)
    }

    /// Relocates `node` under `new_parent` the way a fragment re-parse
    /// does: the attachment trigger must run during the move even though
    /// the node is parser-inserted.
    pub fn reparse_move(&self, node: &Rc<Node>, new_parent: &Rc<Node>) {
        if let Some(script) = node.as_script() {
            script.set_moving_due_to_reparse(true);
        }
        if let Some(parent) = node.parent_node() {
            parent.remove_child(node);
        }
        new_parent.append_child(node);
        if let Some(script) = node.as_script() {
            script.set_moving_due_to_reparse(false);
        }
    }
}
