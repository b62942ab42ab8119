/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::LocalName;

use crate::dom::attr::Attr;
use crate::dom::bindings::str::DOMString;
use crate::dom::htmlscriptelement::HTMLScriptElement;

/// Who created an element. The script element derives its parser-inserted
/// state and line number from this.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElementCreator {
    ParserCreated(u64),
    ScriptCreated,
}

impl ElementCreator {
    pub fn is_parser_created(&self) -> bool {
        match *self {
            ElementCreator::ParserCreated(_) => true,
            ElementCreator::ScriptCreated => false,
        }
    }

    pub fn return_line_number(&self) -> u64 {
        match *self {
            ElementCreator::ParserCreated(line_number) => line_number,
            ElementCreator::ScriptCreated => 1,
        }
    }
}

/// A notification handed to `VirtualMethods::attribute_mutated`.
/// <https://dom.spec.whatwg.org/#attribute-is-set>
/// <https://dom.spec.whatwg.org/#attribute-is-removed>
#[derive(Clone, Copy, Debug)]
pub enum AttributeMutation<'a> {
    /// The attribute is set, keeping track of the replaced value if any.
    Set(Option<&'a DOMString>),
    /// The attribute is removed.
    Removed,
}

/// Element-specific node state: the tag name, the content attributes, and
/// the script-element state for `script` elements (the only element kind
/// with behavior of its own in this reduced DOM).
pub struct Element {
    local_name: LocalName,
    attrs: RefCell<Vec<Rc<Attr>>>,
    script: Option<HTMLScriptElement>,
}

impl Element {
    pub(crate) fn new_inherited(
        local_name: LocalName,
        script: Option<HTMLScriptElement>,
    ) -> Element {
        Element {
            local_name,
            attrs: RefCell::new(vec![]),
            script,
        }
    }

    pub fn local_name(&self) -> &LocalName {
        &self.local_name
    }

    pub fn script(&self) -> Option<&HTMLScriptElement> {
        self.script.as_ref()
    }

    pub fn get_attribute(&self, name: &LocalName) -> Option<Rc<Attr>> {
        self.attrs
            .borrow()
            .iter()
            .find(|attr| attr.local_name() == name)
            .cloned()
    }

    pub fn has_attribute(&self, name: &LocalName) -> bool {
        self.get_attribute(name).is_some()
    }

    /// A snapshot of the attribute list.
    pub fn attributes(&self) -> Vec<Rc<Attr>> {
        self.attrs.borrow().clone()
    }

    /// Appends an attribute without firing mutation notifications; used by
    /// node cloning, which copies attributes raw.
    pub(crate) fn push_attribute(&self, attr: Rc<Attr>) {
        self.attrs.borrow_mut().push(attr);
    }

    pub(crate) fn take_attribute(&self, name: &LocalName) -> Option<Rc<Attr>> {
        let mut attrs = self.attrs.borrow_mut();
        let index = attrs.iter().position(|attr| attr.local_name() == name)?;
        Some(attrs.remove(index))
    }
}
