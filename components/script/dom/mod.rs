/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

pub mod attr;
pub mod bindings;
pub mod document;
pub mod element;
pub mod htmlscriptelement;
pub mod node;
pub mod parser;
pub mod virtualmethods;
pub mod window;
