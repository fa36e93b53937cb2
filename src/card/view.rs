// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Maps controller state to what the control surface shows.

use serde::Serialize;

use crate::card::nav::NavigationState;
use crate::card::nav::Phase;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Uninitialized,
    Ready,
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Uninitialized => "uninitialized",
            Status::Ready => "ready",
            Status::Failed => "failed",
        }
    }
}

/// Which controls are shown. A control that is shown but not enabled is
/// rendered disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub open: bool,
    pub prev: bool,
    pub prev_enabled: bool,
    pub next: bool,
    pub reset: bool,
    pub autoplay: bool,
    pub mute: bool,
    pub share: bool,
    pub fallback: bool,
}

/// A snapshot of everything the rendering layer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub status: Status,
    pub phase: Option<Phase>,
    /// The one visible page, if any.
    pub visible_page: Option<usize>,
    pub page_count: usize,
    pub controls: Controls,
    pub autoplay_active: bool,
    pub autoplay_interval: u64,
    pub muted: bool,
    pub failure: Option<String>,
}

pub struct ViewInput<'a> {
    pub navigation: Option<NavigationState>,
    pub failure: Option<&'a str>,
    pub autoplay_active: bool,
    pub autoplay_interval: u64,
    pub muted: bool,
}

pub fn derive_view(input: ViewInput<'_>) -> ViewState {
    let ViewInput {
        navigation,
        failure,
        autoplay_active,
        autoplay_interval,
        muted,
    } = input;
    if let Some(reason) = failure {
        return ViewState {
            status: Status::Failed,
            phase: None,
            visible_page: None,
            page_count: 0,
            controls: Controls {
                fallback: true,
                ..Controls::default()
            },
            autoplay_active: false,
            autoplay_interval,
            muted,
            failure: Some(reason.to_string()),
        };
    }
    let Some(nav) = navigation else {
        return ViewState {
            status: Status::Uninitialized,
            phase: None,
            visible_page: None,
            page_count: 0,
            controls: Controls::default(),
            autoplay_active: false,
            autoplay_interval,
            muted,
            failure: None,
        };
    };
    let phase = nav.phase();
    let controls = match phase {
        Phase::ClosedAtCover => Controls {
            open: true,
            ..Controls::default()
        },
        Phase::Open | Phase::OpenAtBack => {
            let at_back = phase == Phase::OpenAtBack;
            Controls {
                open: false,
                prev: true,
                prev_enabled: nav.current_page() > 0,
                next: !at_back,
                reset: at_back,
                autoplay: !at_back,
                mute: true,
                share: true,
                fallback: false,
            }
        }
    };
    ViewState {
        status: Status::Ready,
        phase: Some(phase),
        visible_page: Some(nav.current_page()),
        page_count: nav.page_count(),
        controls,
        autoplay_active,
        autoplay_interval,
        muted,
        failure: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_of(nav: NavigationState) -> ViewState {
        derive_view(ViewInput {
            navigation: Some(nav),
            failure: None,
            autoplay_active: false,
            autoplay_interval: 3000,
            muted: false,
        })
    }

    #[test]
    fn test_closed_shows_only_open() {
        let view = view_of(NavigationState::new(4));
        assert_eq!(view.visible_page, Some(0));
        assert_eq!(
            view.controls,
            Controls {
                open: true,
                ..Controls::default()
            }
        );
    }

    #[test]
    fn test_interior_page() {
        let view = view_of(NavigationState::new(4).open());
        assert_eq!(view.visible_page, Some(1));
        assert!(view.controls.prev_enabled);
        assert!(view.controls.next);
        assert!(view.controls.autoplay);
        assert!(!view.controls.reset);
        assert!(view.controls.mute);
        assert!(view.controls.share);
    }

    #[test]
    fn test_back_page_swaps_next_for_reset() {
        let nav = NavigationState::new(3).open().next();
        let view = view_of(nav);
        assert_eq!(view.phase, Some(Phase::OpenAtBack));
        assert!(!view.controls.next);
        assert!(!view.controls.autoplay);
        assert!(view.controls.reset);
    }

    #[test]
    fn test_single_open_page_has_prev_disabled() {
        let view = view_of(NavigationState::new(1).open());
        assert!(view.controls.prev);
        assert!(!view.controls.prev_enabled);
        assert!(view.controls.reset);
    }

    #[test]
    fn test_failed() {
        let view = derive_view(ViewInput {
            navigation: None,
            failure: Some("load error: gone"),
            autoplay_active: false,
            autoplay_interval: 3000,
            muted: false,
        });
        assert_eq!(view.status, Status::Failed);
        assert_eq!(view.visible_page, None);
        assert!(view.controls.fallback);
        assert!(!view.controls.open);
        assert_eq!(view.failure.as_deref(), Some("load error: gone"));
    }
}
