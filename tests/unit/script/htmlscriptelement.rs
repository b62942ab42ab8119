/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use embedder_traits::{
    ExternalScript, InlineScript, RunScripts, ScriptDispatcher, ScriptError,
};
use html5ever::local_name;
use script::dom::bindings::str::DOMString;
use script::dom::document::Document;
use script::dom::element::ElementCreator;
use script::dom::htmlscriptelement::PrepareOutcome;
use script::dom::node::Node;
use script::dom::window::Window;
use url::Url;

use crate::common::{scripting_document, document_with_policy, BASE_URL};

fn api_script(doc: &Rc<Document>) -> Rc<Node> {
    doc.create_element(local_name!("script"), ElementCreator::ScriptCreated)
}

fn api_script_with_text(doc: &Rc<Document>, text: &str) -> Rc<Node> {
    let script = api_script(doc);
    script.set_text_content(DOMString::from(text));
    script
}

#[test]
fn inline_script_dispatches_once_on_api_attachment() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script_with_text(&doc, "console.log(1)");
    assert_eq!(dispatcher.dispatch_count(), 0);

    doc.document_node().append_child(&script);
    assert_eq!(dispatcher.inline.borrow().len(), 1);
    let dispatched = dispatcher.inline.borrow()[0].clone();
    assert_eq!(dispatched.text, "console.log(1)");
    assert_eq!(dispatched.base_url, Url::parse(BASE_URL).unwrap());

    // A second manual invocation of the entry point is a no-op.
    let element = script.as_script().unwrap();
    assert_eq!(element.prepare(), PrepareOutcome::AlreadyStarted);
    assert_eq!(dispatcher.dispatch_count(), 1);
}

#[test]
fn prepare_twice_dispatches_once() {
    let (doc, dispatcher, _) = scripting_document();
    // A parser-created script ignores the attachment and children-changed
    // triggers, so the manual calls below are the only candidates.
    let script = doc.create_element(local_name!("script"), ElementCreator::ParserCreated(1));
    doc.document_node().append_child(&script);
    let text = doc.create_text_node(DOMString::from("f()"));
    script.append_child(&text);
    assert_eq!(dispatcher.dispatch_count(), 0);

    let element = script.as_script().unwrap();
    assert_eq!(element.prepare(), PrepareOutcome::DispatchedInline);
    assert_eq!(element.prepare(), PrepareOutcome::AlreadyStarted);
    assert_eq!(dispatcher.dispatch_count(), 1);
}

#[test]
fn no_content_never_dispatches() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script(&doc);
    doc.document_node().append_child(&script);

    let element = script.as_script().unwrap();
    assert_eq!(element.prepare(), PrepareOutcome::NothingToExecute);
    assert!(!element.already_started());
    assert_eq!(dispatcher.dispatch_count(), 0);
}

#[test]
fn detached_script_never_dispatches() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script_with_text(&doc, "f()");

    let element = script.as_script().unwrap();
    assert_eq!(element.prepare(), PrepareOutcome::NotConnected);
    assert_eq!(dispatcher.dispatch_count(), 0);

    // The attaching append is the trigger that dispatches.
    doc.document_node().append_child(&script);
    assert_eq!(dispatcher.inline.borrow().len(), 1);
}

#[test]
fn module_type_is_not_dispatched_and_does_not_commit() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script_with_text(&doc, "export default 1;");
    script.set_attribute(local_name!("type"), DOMString::from("module"));
    doc.document_node().append_child(&script);
    assert_eq!(dispatcher.dispatch_count(), 0);

    let element = script.as_script().unwrap();
    assert_eq!(element.prepare(), PrepareOutcome::NonClassicType);
    assert!(!element.already_started());

    // The flag never committed, so retyping to classic lets a later
    // trigger start the element after all.
    script.set_attribute(local_name!("type"), DOMString::from("text/javascript"));
    assert_eq!(element.prepare(), PrepareOutcome::DispatchedInline);
    assert_eq!(dispatcher.inline.borrow().len(), 1);
}

#[test]
fn unrecognized_type_is_not_dispatched() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script_with_text(&doc, "not a script");
    script.set_attribute(local_name!("type"), DOMString::from("text/plain"));
    doc.document_node().append_child(&script);

    let element = script.as_script().unwrap();
    assert_eq!(element.prepare(), PrepareOutcome::NonClassicType);
    assert!(!element.already_started());
    assert_eq!(dispatcher.dispatch_count(), 0);
}

#[test]
fn language_attribute_selects_classic() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script_with_text(&doc, "f()");
    script.set_attribute(local_name!("language"), DOMString::from("javascript"));
    doc.document_node().append_child(&script);
    assert_eq!(dispatcher.inline.borrow().len(), 1);
}

#[test]
fn clone_after_start_never_starts_again() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script_with_text(&doc, "f()");
    doc.document_node().append_child(&script);
    assert_eq!(dispatcher.dispatch_count(), 1);

    let copy = script.clone_node(true);
    let copy_element = copy.as_script().unwrap();
    assert!(copy_element.already_started());

    // Reattaching the copy with qualifying content changes nothing.
    doc.document_node().append_child(&copy);
    assert_eq!(copy_element.prepare(), PrepareOutcome::AlreadyStarted);
    assert_eq!(dispatcher.dispatch_count(), 1);
}

#[test]
fn clone_before_start_starts_independently() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script_with_text(&doc, "f()");
    let copy = script.clone_node(true);

    doc.document_node().append_child(&script);
    doc.document_node().append_child(&copy);
    assert_eq!(dispatcher.inline.borrow().len(), 2);

    // The flag is per-node state, not shared by reference.
    assert!(script.as_script().unwrap().already_started());
    assert!(copy.as_script().unwrap().already_started());
    assert_eq!(script.as_script().unwrap().prepare(), PrepareOutcome::AlreadyStarted);
    assert_eq!(copy.as_script().unwrap().prepare(), PrepareOutcome::AlreadyStarted);
    assert_eq!(dispatcher.dispatch_count(), 2);
}

#[test]
fn src_fast_path_fires_once_per_transition() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script(&doc);

    // Absent to present on a not-yet-started node starts the pre-fetch,
    // attached or not; the started flag is untouched.
    script.set_attribute(local_name!("src"), DOMString::from("main.js"));
    assert_eq!(dispatcher.external.borrow().len(), 1);
    assert_eq!(
        dispatcher.external.borrow()[0].url.as_str(),
        "https://example.com/app/main.js"
    );
    assert!(!script.as_script().unwrap().already_started());

    // Present to present is not a transition.
    script.set_attribute(local_name!("src"), DOMString::from("other.js"));
    assert_eq!(dispatcher.external.borrow().len(), 1);

    // Removing and setting again is a new absent-to-present transition.
    script.remove_attribute(&local_name!("src"));
    script.set_attribute(local_name!("src"), DOMString::from("again.js"));
    assert_eq!(dispatcher.external.borrow().len(), 2);
}

#[test]
fn src_fast_path_ignores_empty_values_and_started_nodes() {
    let (doc, dispatcher, _) = scripting_document();

    let script = api_script(&doc);
    script.set_attribute(local_name!("src"), DOMString::from(""));
    assert_eq!(dispatcher.external.borrow().len(), 0);

    let started = api_script_with_text(&doc, "f()");
    doc.document_node().append_child(&started);
    assert_eq!(dispatcher.inline.borrow().len(), 1);
    started.set_attribute(local_name!("src"), DOMString::from("late.js"));
    assert_eq!(dispatcher.external.borrow().len(), 0);
}

#[test]
fn external_script_dispatches_resolved_url_on_attachment() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script(&doc);
    doc.document_node().append_child(&script);
    assert_eq!(dispatcher.dispatch_count(), 0);

    // Attribute mutation alone never runs the gate, only the pre-fetch;
    // prepare by hand to exercise the gate's external branch.
    script.set_attribute(local_name!("src"), DOMString::from("../lib/app.js"));
    assert_eq!(dispatcher.external.borrow().len(), 1);
    let element = script.as_script().unwrap();
    assert_eq!(element.prepare(), PrepareOutcome::DispatchedExternal);
    assert_eq!(dispatcher.external.borrow().len(), 2);
    assert_eq!(
        dispatcher.external.borrow()[1].url.as_str(),
        "https://example.com/lib/app.js"
    );
}

#[test]
fn no_window_commits_without_dispatch() {
    let (doc, dispatcher, _) = document_with_policy(None);
    assert!(doc.window().is_none());
    let script = api_script_with_text(&doc, "f()");
    doc.document_node().append_child(&script);

    assert!(script.as_script().unwrap().already_started());
    assert_eq!(dispatcher.dispatch_count(), 0);
}

#[test]
fn non_dangerous_policies_commit_without_dispatch() {
    for policy in [RunScripts::OutsideOnly, RunScripts::Disabled] {
        let (doc, dispatcher, _) = document_with_policy(Some(policy));
        let script = api_script_with_text(&doc, "f()");
        doc.document_node().append_child(&script);

        assert!(script.as_script().unwrap().already_started());
        assert_eq!(dispatcher.dispatch_count(), 0);
    }
}

#[test]
fn document_override_commits_without_dispatch() {
    let (doc, dispatcher, _) = scripting_document();
    doc.set_scripting_disabled(true);
    let script = api_script_with_text(&doc, "f()");
    doc.document_node().append_child(&script);

    assert!(script.as_script().unwrap().already_started());
    assert_eq!(dispatcher.dispatch_count(), 0);
}

#[test]
fn default_dispatcher_configuration_commits_quietly() {
    // No dispatcher wired at all: the default null dispatcher swallows the
    // dispatch, and the gate still commits.
    let doc = Document::new(Url::parse(BASE_URL).unwrap());
    doc.set_window(Some(Window::new(RunScripts::Dangerously)));
    let script = api_script_with_text(&doc, "f()");
    doc.document_node().append_child(&script);

    let element = script.as_script().unwrap();
    assert!(element.already_started());
    assert_eq!(element.prepare(), PrepareOutcome::AlreadyStarted);
}

#[test]
fn empty_src_reports_fetch_error() {
    let (doc, dispatcher, reporter) = scripting_document();
    let script = api_script(&doc);
    script.set_attribute(local_name!("src"), DOMString::from(""));
    doc.document_node().append_child(&script);

    // A present-but-empty src passes the content check, so the gate
    // commits and the bridge reports instead of dispatching.
    let element = script.as_script().unwrap();
    assert!(element.already_started());
    assert_eq!(dispatcher.dispatch_count(), 0);
    let errors = reporter.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ScriptError::Fetch(_)));
    assert!(script.is_connected());
}

#[test]
fn unresolvable_src_reports_fetch_error() {
    let (doc, dispatcher, reporter) = scripting_document();
    let script = api_script(&doc);
    script.set_attribute(local_name!("src"), DOMString::from("https://[invalid"));
    doc.document_node().append_child(&script);

    assert_eq!(dispatcher.dispatch_count(), 0);
    // Both the fast path and the gate tried to resolve the reference.
    assert_eq!(reporter.errors.borrow().len(), 2);
    assert!(matches!(reporter.errors.borrow()[0], ScriptError::Fetch(_)));
    assert!(script.is_connected());
}

/// Dispatcher that reports a runtime failure through the document channel,
/// like a script engine whose evaluation threw.
struct ThrowingDispatcher {
    document: RefCell<Weak<Document>>,
}

impl ScriptDispatcher for ThrowingDispatcher {
    fn dispatch_external_script(&self, _: ExternalScript) {}

    fn dispatch_inline_script(&self, _: InlineScript) {
        if let Some(doc) = self.document.borrow().upgrade() {
            doc.report_script_error(&ScriptError::Runtime("boom".to_owned()));
        }
    }
}

#[test]
fn dispatch_failure_reports_without_aborting_the_trigger() {
    let (doc, _, reporter) = scripting_document();
    let dispatcher = Rc::new(ThrowingDispatcher {
        document: RefCell::new(Rc::downgrade(&doc)),
    });
    doc.set_script_dispatcher(dispatcher);

    let script = api_script_with_text(&doc, "throw new Error('boom')");
    doc.document_node().append_child(&script);

    // The failure reached the channel, and the attachment completed:
    // the node is connected and unrelated nodes keep working.
    assert_eq!(reporter.errors.borrow().len(), 1);
    assert_eq!(
        reporter.errors.borrow()[0],
        ScriptError::Runtime("boom".to_owned())
    );
    assert!(script.is_connected());
    let sibling = doc.create_element(local_name!("p"), ElementCreator::ScriptCreated);
    doc.document_node().append_child(&sibling);
    assert!(sibling.is_connected());
}

#[test]
fn setting_text_starts_an_attached_script() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script(&doc);
    doc.document_node().append_child(&script);
    assert_eq!(dispatcher.dispatch_count(), 0);

    let element = script.as_script().unwrap();
    element.set_text(DOMString::from("f()"));
    assert_eq!(element.text(), "f()");
    assert_eq!(dispatcher.inline.borrow().len(), 1);
    assert_eq!(dispatcher.inline.borrow()[0].text, "f()");
}

#[test]
fn reattachment_after_start_is_a_noop() {
    let (doc, dispatcher, _) = scripting_document();
    let script = api_script_with_text(&doc, "f()");
    doc.document_node().append_child(&script);
    assert_eq!(dispatcher.dispatch_count(), 1);

    doc.document_node().remove_child(&script);
    assert!(!script.is_connected());
    doc.document_node().append_child(&script);
    assert_eq!(dispatcher.dispatch_count(), 1);
}
