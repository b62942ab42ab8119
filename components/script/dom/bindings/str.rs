/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The `DOMString` type.

use std::fmt;
use std::ops::Deref;

/// The space characters recognized by the HTML attribute-value rules.
/// <https://html.spec.whatwg.org/multipage/#space-characters>
pub static HTML_SPACE_CHARACTERS: &[char] = &['\u{20}', '\u{9}', '\u{a}', '\u{c}', '\u{d}'];

/// A DOM string, always valid UTF-8 in this implementation.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DOMString(String);

impl DOMString {
    pub fn new() -> DOMString {
        DOMString(String::new())
    }

    pub fn push_str(&mut self, string: &str) {
        self.0.push_str(string)
    }
}

impl Deref for DOMString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DOMString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<String> for DOMString {
    fn from(string: String) -> DOMString {
        DOMString(string)
    }
}

impl From<&str> for DOMString {
    fn from(string: &str) -> DOMString {
        DOMString(string.to_owned())
    }
}

impl From<DOMString> for String {
    fn from(string: DOMString) -> String {
        string.0
    }
}

impl PartialEq<str> for DOMString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<'a> PartialEq<&'a str> for DOMString {
    fn eq(&self, other: &&'a str) -> bool {
        self.0 == *other
    }
}
