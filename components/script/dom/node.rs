/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The tree machinery: `Rc`-linked nodes with connectivity tracking and the
//! hook dispatch that element kinds rely on.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use html5ever::{local_name, LocalName};

use crate::dom::attr::Attr;
use crate::dom::bindings::str::DOMString;
use crate::dom::document::Document;
use crate::dom::element::{AttributeMutation, Element, ElementCreator};
use crate::dom::htmlscriptelement::HTMLScriptElement;
use crate::dom::virtualmethods::vtable_for;

/// Context for the `bind_to_tree` hook.
pub struct BindContext {
    /// Whether the tree the node just joined participates in the live
    /// document.
    pub tree_connected: bool,
}

/// Context for the `unbind_from_tree` hook.
pub struct UnbindContext {
    /// Whether the tree the node just left participated in the live
    /// document.
    pub tree_connected: bool,
}

/// What changed in a node's child list.
pub enum ChildrenMutation<'a> {
    Append { added: &'a Rc<Node> },
    Removed { removed: &'a Rc<Node> },
    ReplaceAll { added: &'a [Rc<Node>] },
}

#[derive(Clone, Copy, Eq, PartialEq)]
pub enum CloneChildrenFlag {
    CloneChildren,
    DoNotCloneChildren,
}

/// The per-kind payload of a node.
pub enum NodeData {
    /// The root container of a document's tree.
    Document,
    Text(RefCell<DOMString>),
    Element(Element),
}

pub struct Node {
    /// Back-reference to the `Rc` this node lives in, so that `&self`
    /// methods can hand out parent links.
    self_ref: Weak<Node>,
    parent_node: RefCell<Weak<Node>>,
    children: RefCell<Vec<Rc<Node>>>,
    /// Whether this node is part of the owning document's live tree.
    connected: Cell<bool>,
    owner_doc: Weak<Document>,
    data: NodeData,
}

impl Node {
    fn new_inherited(self_ref: Weak<Node>, owner_doc: Weak<Document>, data: NodeData) -> Node {
        Node {
            self_ref,
            parent_node: RefCell::new(Weak::new()),
            children: RefCell::new(vec![]),
            connected: Cell::new(false),
            owner_doc,
            data,
        }
    }

    pub(crate) fn new_document(owner_doc: Weak<Document>) -> Rc<Node> {
        let node = Rc::new_cyclic(|weak| {
            Node::new_inherited(weak.clone(), owner_doc, NodeData::Document)
        });
        node.connected.set(true);
        node
    }

    pub(crate) fn new_element(
        owner_doc: Weak<Document>,
        local_name: LocalName,
        creator: ElementCreator,
    ) -> Rc<Node> {
        Rc::new_cyclic(|weak| {
            let script = if local_name == local_name!("script") {
                Some(HTMLScriptElement::new_inherited(weak.clone(), creator))
            } else {
                None
            };
            Node::new_inherited(
                weak.clone(),
                owner_doc,
                NodeData::Element(Element::new_inherited(local_name, script)),
            )
        })
    }

    pub(crate) fn new_text(owner_doc: Weak<Document>, data: DOMString) -> Rc<Node> {
        Rc::new_cyclic(|weak| {
            Node::new_inherited(weak.clone(), owner_doc, NodeData::Text(RefCell::new(data)))
        })
    }

    /// The document this node was created for. Fallible, unlike its
    /// garbage-collected counterparts: the document may already be gone.
    pub fn owner_document(&self) -> Option<Rc<Document>> {
        self.owner_doc.upgrade()
    }

    pub fn parent_node(&self) -> Option<Rc<Node>> {
        self.parent_node.borrow().upgrade()
    }

    /// A snapshot of the child list.
    pub fn children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_script(&self) -> Option<&HTMLScriptElement> {
        self.as_element().and_then(Element::script)
    }

    pub fn get_attribute(&self, name: &LocalName) -> Option<Rc<Attr>> {
        self.as_element()
            .and_then(|element| element.get_attribute(name))
    }

    pub fn has_attribute(&self, name: &LocalName) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Sets a content attribute and notifies the element's hooks.
    pub fn set_attribute(&self, name: LocalName, value: DOMString) {
        let Some(element) = self.as_element() else {
            return;
        };
        let (attr, old_value) = match element.get_attribute(&name) {
            Some(attr) => {
                let old = attr.value().clone();
                attr.set_value(value);
                (attr, Some(old))
            },
            None => {
                let attr = Rc::new(Attr::new(name, value));
                element.push_attribute(attr.clone());
                (attr, None)
            },
        };
        if let Some(vtable) = vtable_for(self) {
            vtable.attribute_mutated(&attr, AttributeMutation::Set(old_value.as_ref()));
        }
    }

    pub fn remove_attribute(&self, name: &LocalName) {
        let Some(element) = self.as_element() else {
            return;
        };
        let Some(attr) = element.take_attribute(name) else {
            return;
        };
        if let Some(vtable) = vtable_for(self) {
            vtable.attribute_mutated(&attr, AttributeMutation::Removed);
        }
    }

    /// <https://dom.spec.whatwg.org/#concept-node-append>, without the
    /// pre-insertion validity checks.
    pub fn append_child(&self, child: &Rc<Node>) {
        if let Some(old_parent) = child.parent_node() {
            old_parent.remove_child(child);
        }
        *child.parent_node.borrow_mut() = self.self_ref.clone();
        self.children.borrow_mut().push(child.clone());
        if self.is_connected() {
            child.bind_subtree(&BindContext {
                tree_connected: true,
            });
        }
        if let Some(vtable) = vtable_for(self) {
            vtable.children_changed(&ChildrenMutation::Append { added: child });
        }
    }

    pub fn remove_child(&self, child: &Rc<Node>) {
        {
            let mut children = self.children.borrow_mut();
            let Some(index) = children.iter().position(|c| Rc::ptr_eq(c, child)) else {
                return;
            };
            children.remove(index);
        }
        *child.parent_node.borrow_mut() = Weak::new();
        if child.is_connected() {
            child.unbind_subtree(&UnbindContext {
                tree_connected: true,
            });
        }
        if let Some(vtable) = vtable_for(self) {
            vtable.children_changed(&ChildrenMutation::Removed { removed: child });
        }
    }

    /// <https://dom.spec.whatwg.org/#concept-node-replace-all>; fires a
    /// single `children_changed` notification for the whole replacement.
    pub(crate) fn replace_all(&self, new_child: Option<Rc<Node>>) {
        let removed: Vec<Rc<Node>> = std::mem::take(&mut *self.children.borrow_mut());
        for child in &removed {
            *child.parent_node.borrow_mut() = Weak::new();
            if child.is_connected() {
                child.unbind_subtree(&UnbindContext {
                    tree_connected: true,
                });
            }
        }
        let added: Vec<Rc<Node>> = new_child.into_iter().collect();
        for child in &added {
            *child.parent_node.borrow_mut() = self.self_ref.clone();
            self.children.borrow_mut().push(child.clone());
            if self.is_connected() {
                child.bind_subtree(&BindContext {
                    tree_connected: true,
                });
            }
        }
        if let Some(vtable) = vtable_for(self) {
            vtable.children_changed(&ChildrenMutation::ReplaceAll {
                added: added.as_slice(),
            });
        }
    }

    /// The concatenation of this node's direct text children.
    pub fn child_text_content(&self) -> DOMString {
        let mut content = DOMString::new();
        for child in self.children.borrow().iter() {
            if let NodeData::Text(data) = &child.data {
                content.push_str(&data.borrow());
            }
        }
        content
    }

    /// <https://dom.spec.whatwg.org/#dom-node-textcontent> setter: on an
    /// element, replaces all children with a single text node (or nothing
    /// for an empty value).
    pub fn set_text_content(&self, value: DOMString) {
        match &self.data {
            NodeData::Text(data) => {
                *data.borrow_mut() = value;
            },
            NodeData::Element(_) | NodeData::Document => {
                let new_child = match self.owner_document() {
                    Some(doc) if !value.is_empty() => Some(doc.create_text_node(value)),
                    _ => None,
                };
                self.replace_all(new_child);
            },
        }
    }

    /// <https://dom.spec.whatwg.org/#concept-node-clone>
    pub fn clone_node(&self, deep: bool) -> Rc<Node> {
        let clone_children = if deep {
            CloneChildrenFlag::CloneChildren
        } else {
            CloneChildrenFlag::DoNotCloneChildren
        };
        self.clone_with(clone_children)
    }

    fn clone_with(&self, clone_children: CloneChildrenFlag) -> Rc<Node> {
        let copy = match &self.data {
            NodeData::Document => Node::new_document(self.owner_doc.clone()),
            NodeData::Text(data) => Node::new_text(self.owner_doc.clone(), data.borrow().clone()),
            NodeData::Element(element) => {
                // Copies are script-created by definition: how the original
                // entered its tree is not a property of the content.
                let copy = Node::new_element(
                    self.owner_doc.clone(),
                    element.local_name().clone(),
                    ElementCreator::ScriptCreated,
                );
                if let Some(copy_element) = copy.as_element() {
                    for attr in element.attributes() {
                        copy_element.push_attribute(Rc::new(Attr::new(
                            attr.local_name().clone(),
                            attr.value().clone(),
                        )));
                    }
                }
                copy
            },
        };
        let maybe_doc = self.owner_document();
        if let Some(vtable) = vtable_for(self) {
            vtable.cloning_steps(&copy, maybe_doc.as_ref(), clone_children);
        }
        if clone_children == CloneChildrenFlag::CloneChildren {
            for child in self.children() {
                let child_copy = child.clone_with(CloneChildrenFlag::CloneChildren);
                copy.append_child(&child_copy);
            }
        }
        copy
    }

    fn bind_subtree(&self, context: &BindContext) {
        self.connected.set(context.tree_connected);
        if let Some(vtable) = vtable_for(self) {
            vtable.bind_to_tree(context);
        }
        for child in self.children() {
            child.bind_subtree(context);
        }
    }

    fn unbind_subtree(&self, context: &UnbindContext) {
        self.connected.set(false);
        if let Some(vtable) = vtable_for(self) {
            vtable.unbind_from_tree(context);
        }
        for child in self.children() {
            child.unbind_subtree(context);
        }
    }
}
