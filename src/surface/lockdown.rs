// ── Capability lockdown ───────────────────────────────────────────────────────
//
// The fixed set of browser-surface restrictions applied once the trusted
// document has loaded.  The policy is expressed as a list of
// `(Capability, enabled)` pairs and written through `SurfaceSettings`, so the
// WebView2 settings object and the test fake share one code path.

/// A toggle on the embedded browser surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Capability {
    DevTools,
    ScriptDialogs,
    Script,
    ZoomControl,
    BuiltInErrorPage,
    StatusBar,
    ContextMenus,
}

/// Writable settings of an embedded browser surface.
pub(crate) trait SurfaceSettings {
    type Error;

    fn set_capability(&mut self, capability: Capability, enabled: bool) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LockdownPolicy {
    /// Also turn off the default context menu.
    pub(crate) disable_context_menus: bool,
}

impl LockdownPolicy {
    /// Settings written by `apply`.  Script stays enabled: the editor page
    /// needs it to render and highlight.
    pub(crate) fn settings(&self) -> Vec<(Capability, bool)> {
        let mut settings = vec![
            (Capability::DevTools, false),
            (Capability::ScriptDialogs, false),
            (Capability::Script, true),
            (Capability::ZoomControl, false),
            (Capability::BuiltInErrorPage, false),
            (Capability::StatusBar, false),
        ];
        if self.disable_context_menus {
            settings.push((Capability::ContextMenus, false));
        }
        settings
    }

    /// Write the policy to `surface`.  Every call writes the same absolute
    /// values, so applying twice is the same as applying once.
    pub(crate) fn apply<S: SurfaceSettings>(&self, surface: &mut S) -> Result<(), S::Error> {
        for (capability, enabled) in self.settings() {
            surface.set_capability(capability, enabled)?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory surface that starts with everything enabled, like a fresh
    /// WebView2.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct FakeSurface {
        flags: BTreeMap<Capability, bool>,
        writes: usize,
    }

    impl FakeSurface {
        fn new() -> Self {
            let flags = [
                Capability::DevTools,
                Capability::ScriptDialogs,
                Capability::Script,
                Capability::ZoomControl,
                Capability::BuiltInErrorPage,
                Capability::StatusBar,
                Capability::ContextMenus,
            ]
            .into_iter()
            .map(|c| (c, true))
            .collect();
            Self { flags, writes: 0 }
        }
    }

    impl SurfaceSettings for FakeSurface {
        type Error = std::convert::Infallible;

        fn set_capability(&mut self, capability: Capability, enabled: bool) -> Result<(), Self::Error> {
            self.flags.insert(capability, enabled);
            self.writes += 1;
            Ok(())
        }
    }

    struct FailingSurface;

    impl SurfaceSettings for FailingSurface {
        type Error = &'static str;

        fn set_capability(&mut self, _: Capability, _: bool) -> Result<(), Self::Error> {
            Err("settings unavailable")
        }
    }

    #[test]
    fn default_policy_locks_surface_but_keeps_script() {
        let mut surface = FakeSurface::new();
        LockdownPolicy::default().apply(&mut surface).expect("apply");

        assert!(!surface.flags[&Capability::DevTools]);
        assert!(!surface.flags[&Capability::ScriptDialogs]);
        assert!(!surface.flags[&Capability::ZoomControl]);
        assert!(!surface.flags[&Capability::BuiltInErrorPage]);
        assert!(!surface.flags[&Capability::StatusBar]);
        assert!(surface.flags[&Capability::Script]);
        // Context menus are untouched unless the hardening flag is set.
        assert!(surface.flags[&Capability::ContextMenus]);
    }

    #[test]
    fn context_menu_hardening_flag() {
        let mut surface = FakeSurface::new();
        let policy = LockdownPolicy {
            disable_context_menus: true,
        };
        policy.apply(&mut surface).expect("apply");
        assert!(!surface.flags[&Capability::ContextMenus]);
    }

    #[test]
    fn apply_is_idempotent() {
        let policy = LockdownPolicy::default();

        let mut once = FakeSurface::new();
        policy.apply(&mut once).expect("apply");

        let mut twice = FakeSurface::new();
        policy.apply(&mut twice).expect("apply");
        policy.apply(&mut twice).expect("apply again");

        assert_eq!(once.flags, twice.flags);
    }

    #[test]
    fn errors_propagate() {
        assert_eq!(
            LockdownPolicy::default().apply(&mut FailingSurface),
            Err("settings unavailable")
        );
    }
}
