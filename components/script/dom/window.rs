/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::rc::Rc;

use embedder_traits::RunScripts;

/// The browsing-context stand-in. A document without a window has no
/// scripting context at all.
pub struct Window {
    run_scripts: RunScripts,
}

impl Window {
    pub fn new(run_scripts: RunScripts) -> Rc<Window> {
        Rc::new(Window { run_scripts })
    }

    pub fn run_scripts(&self) -> RunScripts {
        self.run_scripts
    }
}
