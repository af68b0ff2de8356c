//! Trigger-character popups: detection, lifecycle, positioning and the adapter contract.

pub mod adapter;
pub mod controller;
pub mod plugin;
pub mod position;
pub mod trigger;
pub mod view;

pub use adapter::{InsertionContext, QueryContext, SuggestionAdapter, TriggerRange};
pub use controller::{
    Commit, KeyOutcome, MenuKey, StartContext, SuggestionController, UpdateContext,
};
pub use plugin::{PluginHost, SuggestionPlugin};
pub use position::{
    position_below, AnchorProvider, AnchorRect, EditorSurface, ListenerId, ListenerOptions,
    PopupPosition, PositionTracker, ScrollContainer, ScrollListener, Viewport, ViewportSurface,
    DEFAULT_MENU_GAP,
};
pub use trigger::{find_trigger, TriggerConfig, TriggerMatch};
pub use view::{MenuEntry, MenuProps, PopupView, Size, ViewFactory};
