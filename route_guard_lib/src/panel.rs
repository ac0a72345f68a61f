/// The mobile panels. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Route,
    Options,
    Results,
    Tracking,
    Profile,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Route,
        Panel::Options,
        Panel::Results,
        Panel::Tracking,
        Panel::Profile,
    ];

    /// Label shown on the nav item; also what marks the item active.
    pub fn label(self) -> &'static str {
        match self {
            Panel::Route => "Route",
            Panel::Options => "Options",
            Panel::Results => "Results",
            Panel::Tracking => "Tracking",
            Panel::Profile => "Profile",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Panel::Route => "🗺️",
            Panel::Options => "⚙️",
            Panel::Results => "📊",
            Panel::Tracking => "📍",
            Panel::Profile => "👤",
        }
    }
}

/// Single source of truth for which panel is open.
///
/// Requesting the already-open panel is a no-op, so a panel is never torn
/// down and re-initialized by its own nav item. Closing hands nav affinity
/// back to the route view.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PanelState {
    current: Option<Panel>,
}

impl PanelState {
    pub fn open(&self) -> Option<Panel> {
        self.current
    }

    /// Returns `true` when the request changed the state.
    pub fn show(&mut self, panel: Panel) -> bool {
        if self.current == Some(panel) {
            return false;
        }
        self.current = Some(panel);
        true
    }

    /// Returns `true` when a panel was actually open.
    pub fn close(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// The nav item that renders active: the open panel, or the route item
    /// after a close (new sessions land back on the planning view).
    pub fn nav_highlight(&self) -> Panel {
        self.current.unwrap_or(Panel::Route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed_with_route_affinity() {
        let state = PanelState::default();
        assert_eq!(state.open(), None);
        assert_eq!(state.nav_highlight(), Panel::Route);
    }

    #[test]
    fn requesting_the_open_panel_is_a_no_op() {
        let mut state = PanelState::default();
        assert!(state.show(Panel::Tracking));
        assert!(!state.show(Panel::Tracking));
        assert_eq!(state.open(), Some(Panel::Tracking));
    }

    #[test]
    fn switching_replaces_the_open_panel() {
        let mut state = PanelState::default();
        state.show(Panel::Route);
        assert!(state.show(Panel::Results));
        // Exactly one panel open afterwards.
        assert_eq!(state.open(), Some(Panel::Results));
    }

    #[test]
    fn close_resets_highlight_to_route() {
        let mut state = PanelState::default();
        state.show(Panel::Profile);
        assert!(state.close());
        assert_eq!(state.open(), None);
        assert_eq!(state.nav_highlight(), Panel::Route);
        // Closing twice is harmless.
        assert!(!state.close());
    }
}
