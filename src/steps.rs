//! Ordered build-step sequencing with short-circuit on failure.

/// A single named unit of work in the build pipeline. Steps only report
/// success or failure; any diagnostics are printed by the step itself.
pub struct Step<'a> {
    pub name: &'static str,
    run: Box<dyn FnOnce() -> bool + 'a>,
}

impl<'a> Step<'a> {
    pub fn new(name: &'static str, run: impl FnOnce() -> bool + 'a) -> Self {
        Self {
            name,
            run: Box::new(run),
        }
    }

    pub fn run(self) -> bool {
        (self.run)()
    }
}

/// Run steps top-to-bottom. Stops at the first failing step and returns its
/// name; remaining steps are not invoked. No retries, no rollback.
pub fn run_steps(steps: Vec<Step<'_>>) -> Result<(), &'static str> {
    for step in steps {
        let name = step.name;
        if !step.run() {
            return Err(name);
        }
    }
    Ok(())
}
