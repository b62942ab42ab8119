/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A reduced DOM centered on the script element's processing model.
//!
//! The tree, attribute, and document machinery here is the minimum needed to
//! host the script element: `Rc`-linked nodes with connectivity tracking,
//! HTML content attributes with mutation notifications, and a document that
//! owns the scripting policy and the embedder's dispatch hooks. The script
//! element itself implements the one-shot execution gate: every trigger
//! (attachment, parser pop, attribute mutation, cloning, re-parse moves)
//! funnels into a single `prepare` entry point that dispatches each element
//! at most once.
//!
//! All triggers are synchronous calls on one logical thread; nothing in the
//! gate suspends before its commit point.

#![deny(unsafe_code)]

#[macro_use]
extern crate log;

pub mod dom;
