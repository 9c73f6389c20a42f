//! Quill Scene - the host side of the curve tools
//!
//! Everything a drawing tool needs from its host, as traits plus an
//! in-memory implementation:
//! - `ViewProvider` / `Viewport` - pointer to world-ray unprojection and camera
//! - `SelectionSource`, `SurfaceQuery`, `CurveEditor` / `Scene` - meshes,
//!   selection and undoable curve creation/deletion
//! - `RenderNotifier` / `PostRenderHub` - "view re-rendered" callbacks
//! - `History` - linear undo/redo of tool commands
//! - Scene files in TOML

pub mod camera;
pub mod format;
pub mod history;
pub mod loader;
pub mod mesh;
pub mod notify;
pub mod scene;
pub mod view;

pub use camera::Camera;
pub use format::SceneFile;
pub use history::{History, HistoryCommand};
pub use loader::{load_scene, load_scene_string};
pub use mesh::{Aabb, Mesh, SurfaceHit};
pub use notify::{CallbackId, PostRenderCallback, PostRenderHub, RenderNotifier};
pub use scene::{CurveEditor, CurveRequest, Scene, SceneNode, SelectionSource, SurfaceQuery};
pub use view::{ViewProvider, Viewport};
