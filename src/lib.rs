//! hoverkit - hover selection, idle spin and eased transitions for 3D scene objects
//!
//! The [`interaction::InteractionController`] is engine agnostic: it talks to the
//! renderer through [`render::SceneBridge`], gets pointer hits from a
//! [`render::SceneQuery`] and drives its own [`tween::TweenEngine`]. The
//! [`scene::SceneGraph`] arena and [`render::RaycastQuery`] are CPU reference
//! implementations of those seams, used by the headless [`app::App`] driver.

pub mod app;
pub mod assets;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod tween;
