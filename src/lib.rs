//! Interactive map-editing core for the world editor.
//!
//! This crate owns the editing surface behind the world editor's 2D canvas:
//! translating raw pointer/wheel/key events into map mutations, keeping the
//! pan/zoom viewport, staging pin relocations behind a "shadow" gesture,
//! authoring roads between pins, and recording every committed mutation in a
//! bounded undo/redo history. Persistence is delegated to a [`store::MapStore`]
//! implementation supplied by the host; rendering is delegated to whoever reads
//! the editor state after each event.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Synchronous [`engine::EngineCore`] and the async [`engine::Editor`] that executes its actions |
//! | [`doc`] | Pins, roads, map metadata, and the in-memory [`doc::MapDoc`] |
//! | [`workspace`] | The editor's data layer: store-backed mutations of the document |
//! | [`camera`] | Pan/zoom viewport and coordinate conversions |
//! | [`input`] | Input event types, tools, selection, and pointer tracking state |
//! | [`hit`] | Hit-testing against pins and roads |
//! | [`place`] | Pin placement: coordinate rounding and default naming |
//! | [`relocate`] | Shadow-drag relocation state machine |
//! | [`connect`] | Two-click road authoring state machine |
//! | [`history`] | Bounded undo/redo history |
//! | [`commands`] | Reversible commands recorded in the history |
//! | [`saga`] | Apply / confirm / compensate helpers for optimistic mutations |
//! | [`store`] | Persistence collaborator trait and an in-memory implementation |
//! | [`replay`] | Scripted event replay used by the CLI |
//! | [`config`] | Environment-driven configuration |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants (zoom limits, hit slop, etc.) |

pub mod camera;
pub mod commands;
pub mod config;
pub mod connect;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod hit;
pub mod history;
pub mod input;
pub mod place;
pub mod relocate;
pub mod replay;
pub mod saga;
pub mod store;
pub mod workspace;
