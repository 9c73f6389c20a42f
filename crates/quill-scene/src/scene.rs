//! In-memory scene: named mesh and curve nodes, an active selection, and the
//! host interfaces tools use to query surfaces and create or delete curves.

use crate::mesh::{Mesh, SurfaceHit};
use quill_core::{CurveForm, EntityId, IdAllocator, NurbsCurve, QuillError, Ray, Result, Vec3};
use std::collections::{BTreeMap, HashMap};

/// Current selection, reduced to the surfaces a tool can draw on
pub trait SelectionSource {
    /// Selected mesh surfaces, in selection order
    fn selected_surfaces(&self) -> Vec<EntityId>;
}

/// Ray queries against individual surfaces
pub trait SurfaceQuery {
    /// Nearest hit of `ray` on `surface` within `max_distance`
    fn closest_intersection(
        &self,
        surface: EntityId,
        ray: &Ray,
        max_distance: f64,
        tolerance: f64,
    ) -> Result<Option<SurfaceHit>>;
}

/// Parameters for building a curve node through edit points
#[derive(Debug, Clone, Copy)]
pub struct CurveRequest<'a> {
    pub edit_points: &'a [Vec3],
    pub degree: usize,
    pub form: CurveForm,
    pub uniform_param: bool,
}

/// Creation and deletion of curve nodes
pub trait CurveEditor {
    fn create_curve(&mut self, request: &CurveRequest<'_>) -> Result<EntityId>;

    fn delete_curve(&mut self, id: EntityId) -> Result<()>;

    /// True while `id` names a curve that has not been deleted
    fn is_live(&self, id: EntityId) -> bool;
}

/// What a scene node holds
#[derive(Debug, Clone)]
pub enum NodeKind {
    Mesh {
        mesh: Mesh,
        /// Intermediate meshes feed deformers and are never drawn on
        intermediate: bool,
    },
    Curve(NurbsCurve),
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
}

/// The in-memory host scene
#[derive(Debug, Default)]
pub struct Scene {
    ids: IdAllocator,
    nodes: BTreeMap<EntityId, SceneNode>,
    names: HashMap<String, EntityId>,
    selection: Vec<EntityId>,
    locked: bool,
    curve_counter: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawable mesh
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) -> Result<EntityId> {
        self.insert(
            name.into(),
            NodeKind::Mesh {
                mesh,
                intermediate: false,
            },
        )
    }

    /// Add a mesh that exists only as deformer input
    pub fn add_intermediate_mesh(
        &mut self,
        name: impl Into<String>,
        mesh: Mesh,
    ) -> Result<EntityId> {
        self.insert(
            name.into(),
            NodeKind::Mesh {
                mesh,
                intermediate: true,
            },
        )
    }

    fn insert(&mut self, name: String, kind: NodeKind) -> Result<EntityId> {
        if self.names.contains_key(&name) {
            return Err(QuillError::DuplicateEntityName(name));
        }
        let id = self.ids.allocate();
        self.names.insert(name.clone(), id);
        self.nodes.insert(id, SceneNode { name, kind });
        Ok(id)
    }

    /// Add a node to the active selection
    pub fn select(&mut self, id: EntityId) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(QuillError::EntityNotFound(id.to_string()));
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
        Ok(())
    }

    /// Full active selection, any node kind
    pub fn selection(&self) -> &[EntityId] {
        &self.selection
    }

    /// Make every create/delete fail, as a host does when the scene is read-only
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn get_id(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    pub fn node(&self, id: EntityId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.name.as_str())
    }

    pub fn mesh(&self, id: EntityId) -> Option<&Mesh> {
        match &self.nodes.get(&id)?.kind {
            NodeKind::Mesh { mesh, .. } => Some(mesh),
            NodeKind::Curve(_) => None,
        }
    }

    pub fn curve(&self, id: EntityId) -> Option<&NurbsCurve> {
        match &self.nodes.get(&id)?.kind {
            NodeKind::Curve(curve) => Some(curve),
            NodeKind::Mesh { .. } => None,
        }
    }

    /// All live curves in creation order
    pub fn curves(&self) -> impl Iterator<Item = (EntityId, &NurbsCurve)> {
        self.nodes.iter().filter_map(|(id, node)| match &node.kind {
            NodeKind::Curve(curve) => Some((*id, curve)),
            NodeKind::Mesh { .. } => None,
        })
    }

    pub fn curve_count(&self) -> usize {
        self.curves().count()
    }

    pub fn entity_count(&self) -> usize {
        self.nodes.len()
    }

    fn next_curve_name(&mut self) -> String {
        loop {
            self.curve_counter += 1;
            let name = format!("curve{}", self.curve_counter);
            if !self.names.contains_key(&name) {
                return name;
            }
        }
    }

    fn reject_if_locked(&self, action: &str) -> Result<()> {
        if self.locked {
            Err(QuillError::SceneLocked(format!("cannot {action} while the scene is locked")))
        } else {
            Ok(())
        }
    }
}

impl SelectionSource for Scene {
    fn selected_surfaces(&self) -> Vec<EntityId> {
        self.selection
            .iter()
            .copied()
            .filter(|id| {
                matches!(
                    self.nodes.get(id).map(|n| &n.kind),
                    Some(NodeKind::Mesh {
                        intermediate: false,
                        ..
                    })
                )
            })
            .collect()
    }
}

impl SurfaceQuery for Scene {
    fn closest_intersection(
        &self,
        surface: EntityId,
        ray: &Ray,
        max_distance: f64,
        tolerance: f64,
    ) -> Result<Option<SurfaceHit>> {
        let node = self
            .nodes
            .get(&surface)
            .ok_or_else(|| QuillError::EntityNotFound(surface.to_string()))?;
        match &node.kind {
            NodeKind::Mesh { mesh, .. } => {
                Ok(mesh.closest_intersection(ray, max_distance, tolerance))
            }
            NodeKind::Curve(_) => Err(QuillError::NotASurface(node.name.clone())),
        }
    }
}

impl CurveEditor for Scene {
    fn create_curve(&mut self, request: &CurveRequest<'_>) -> Result<EntityId> {
        self.reject_if_locked("create a curve")?;
        if request.form != CurveForm::Open {
            return Err(QuillError::CurveConstruction(format!(
                "{:?} curves cannot be built from edit points",
                request.form
            )));
        }
        let curve = NurbsCurve::through_edit_points(
            request.edit_points,
            request.degree,
            request.uniform_param,
        )?;
        let name = self.next_curve_name();
        let id = self.insert(name, NodeKind::Curve(curve))?;
        log::debug!(
            "created curve {id} through {} edit points",
            request.edit_points.len()
        );
        Ok(id)
    }

    fn delete_curve(&mut self, id: EntityId) -> Result<()> {
        self.reject_if_locked("delete a curve")?;
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| QuillError::EntityNotFound(id.to_string()))?;
        if !matches!(node.kind, NodeKind::Curve(_)) {
            return Err(QuillError::NotACurve(node.name.clone()));
        }
        if let Some(node) = self.nodes.remove(&id) {
            self.names.remove(&node.name);
        }
        self.selection.retain(|s| *s != id);
        log::debug!("deleted curve {id}");
        Ok(())
    }

    fn is_live(&self, id: EntityId) -> bool {
        matches!(self.nodes.get(&id).map(|n| &n.kind), Some(NodeKind::Curve(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Axis;

    fn request(points: &[Vec3]) -> CurveRequest<'_> {
        CurveRequest {
            edit_points: points,
            degree: 3,
            form: CurveForm::Open,
            uniform_param: true,
        }
    }

    fn line() -> Vec<Vec3> {
        vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 0.0)]
    }

    #[test]
    fn test_selected_surfaces_skip_curves_and_intermediates() {
        let mut scene = Scene::new();
        let ground = scene.add_mesh("ground", Mesh::quad(Vec3::ZERO, [1.0, 1.0], Axis::Y)).unwrap();
        let orig = scene
            .add_intermediate_mesh("groundOrig", Mesh::quad(Vec3::ZERO, [1.0, 1.0], Axis::Y))
            .unwrap();
        let pts = line();
        let curve = scene.create_curve(&request(&pts)).unwrap();

        scene.select(curve).unwrap();
        scene.select(orig).unwrap();
        scene.select(ground).unwrap();
        scene.select(ground).unwrap();

        assert_eq!(scene.selection().len(), 3);
        assert_eq!(scene.selected_surfaces(), vec![ground]);
    }

    #[test]
    fn test_create_and_delete_curve() {
        let mut scene = Scene::new();
        let pts = line();
        let a = scene.create_curve(&request(&pts)).unwrap();
        let b = scene.create_curve(&request(&pts)).unwrap();
        assert_ne!(a, b);
        assert_eq!(scene.name_of(a), Some("curve1"));
        assert_eq!(scene.name_of(b), Some("curve2"));
        assert_eq!(scene.curve(a).unwrap().edit_points, pts);

        scene.delete_curve(a).unwrap();
        assert!(!scene.is_live(a));
        assert!(scene.is_live(b));
        assert_eq!(scene.curve_count(), 1);
        assert!(matches!(scene.delete_curve(a), Err(QuillError::EntityNotFound(_))));
    }

    #[test]
    fn test_curve_names_skip_taken_names() {
        let mut scene = Scene::new();
        scene.add_mesh("curve1", Mesh::quad(Vec3::ZERO, [1.0, 1.0], Axis::Y)).unwrap();
        let pts = line();
        let id = scene.create_curve(&request(&pts)).unwrap();
        assert_eq!(scene.name_of(id), Some("curve2"));
    }

    #[test]
    fn test_locked_scene_rejects_mutation() {
        let mut scene = Scene::new();
        let pts = line();
        let id = scene.create_curve(&request(&pts)).unwrap();

        scene.set_locked(true);
        assert!(matches!(scene.create_curve(&request(&pts)), Err(QuillError::SceneLocked(_))));
        assert!(matches!(scene.delete_curve(id), Err(QuillError::SceneLocked(_))));
        assert!(scene.is_live(id));
        assert_eq!(scene.curve_count(), 1);
    }

    #[test]
    fn test_mesh_is_not_a_curve() {
        let mut scene = Scene::new();
        let ground = scene.add_mesh("ground", Mesh::quad(Vec3::ZERO, [1.0, 1.0], Axis::Y)).unwrap();
        assert!(!scene.is_live(ground));
        assert!(matches!(scene.delete_curve(ground), Err(QuillError::NotACurve(_))));
    }

    #[test]
    fn test_curve_is_not_a_surface() {
        let mut scene = Scene::new();
        let pts = line();
        let curve = scene.create_curve(&request(&pts)).unwrap();
        let ray = Ray::through(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO).unwrap();
        assert!(matches!(
            scene.closest_intersection(curve, &ray, 1000.0, 1e-5),
            Err(QuillError::NotASurface(_))
        ));
        assert!(matches!(
            scene.closest_intersection(EntityId::from_raw(999), &ray, 1000.0, 1e-5),
            Err(QuillError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_only_open_curves() {
        let mut scene = Scene::new();
        let pts = line();
        let mut req = request(&pts);
        req.form = CurveForm::Periodic;
        assert!(scene.create_curve(&req).is_err());
        assert_eq!(scene.curve_count(), 0);
    }

    #[test]
    fn test_duplicate_names() {
        let mut scene = Scene::new();
        let quad = Mesh::quad(Vec3::ZERO, [1.0, 1.0], Axis::Y);
        scene.add_mesh("ground", quad.clone()).unwrap();
        assert!(matches!(
            scene.add_mesh("ground", quad),
            Err(QuillError::DuplicateEntityName(_))
        ));
    }
}
