/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::rc::Rc;

use crate::dom::attr::Attr;
use crate::dom::document::Document;
use crate::dom::element::AttributeMutation;
use crate::dom::node::{BindContext, ChildrenMutation, CloneChildrenFlag, Node, UnbindContext};

/// Trait to allow DOM nodes to opt into overriding (or adding to) common
/// behaviours. Replicates the effect of C++ virtual methods.
pub trait VirtualMethods {
    /// Called when an attribute of the node is set or removed.
    fn attribute_mutated(&self, _attr: &Attr, _mutation: AttributeMutation) {}

    /// Called on a node when its children are changed.
    fn children_changed(&self, _mutation: &ChildrenMutation) {}

    /// Called when a node becomes part of a tree.
    fn bind_to_tree(&self, _context: &BindContext) {}

    /// Called when a node is removed from a tree.
    fn unbind_from_tree(&self, _context: &UnbindContext) {}

    /// <https://dom.spec.whatwg.org/#concept-node-clone-ext>
    fn cloning_steps(
        &self,
        _copy: &Rc<Node>,
        _maybe_doc: Option<&Rc<Document>>,
        _clone_children: CloneChildrenFlag,
    ) {
    }
}

/// Obtain the hook implementation for a node, if its element kind defines
/// one. Only the script element does in this reduced DOM.
pub(crate) fn vtable_for(node: &Node) -> Option<&dyn VirtualMethods> {
    node.as_script().map(|script| script as &dyn VirtualMethods)
}
