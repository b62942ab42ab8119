/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::cell::{Ref, RefCell};

use html5ever::LocalName;

use crate::dom::bindings::str::DOMString;

/// A single content attribute. Attribute namespaces are not modelled; this
/// DOM only deals in HTML content attributes.
#[derive(Debug)]
pub struct Attr {
    local_name: LocalName,
    value: RefCell<DOMString>,
}

impl Attr {
    pub(crate) fn new(local_name: LocalName, value: DOMString) -> Attr {
        Attr {
            local_name,
            value: RefCell::new(value),
        }
    }

    pub fn local_name(&self) -> &LocalName {
        &self.local_name
    }

    pub fn value(&self) -> Ref<'_, DOMString> {
        self.value.borrow()
    }

    pub(crate) fn set_value(&self, value: DOMString) {
        *self.value.borrow_mut() = value;
    }
}
