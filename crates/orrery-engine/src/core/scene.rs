use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Entities of the running scene, kept sorted by id.
///
/// Ids come from `EngineContext::next_id`, which only grows, so spawning
/// is an append in practice and per-frame lookups binary-search. Tags are
/// for setup and tests; they are scanned.
#[derive(Debug, Default)]
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: EntityId) -> Result<usize, usize> {
        self.entities.binary_search_by_key(&id, |e| e.id)
    }

    /// Add an entity. An entity already holding the same id is replaced
    /// and handed back.
    pub fn spawn(&mut self, entity: Entity) -> Option<Entity> {
        match self.slot(entity.id) {
            Ok(i) => {
                log::warn!("entity {:?} spawned twice; replacing", entity.id);
                Some(std::mem::replace(&mut self.entities[i], entity))
            }
            Err(i) => {
                self.entities.insert(i, entity);
                None
            }
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slot(id).ok().map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let i = self.slot(id).ok()?;
        self.entities.get_mut(i)
    }

    /// In id order, which is spawn order for engine-allocated ids.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity; the host stops drawing them on the next frame.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn lookups_work_whatever_the_spawn_order() {
        let mut scene = Scene::new();
        for n in [3, 1, 2] {
            scene.spawn(Entity::new(EntityId(n)).with_position(Vec3::X * n as f32));
        }
        assert_eq!(scene.get(EntityId(1)).unwrap().position, Vec3::X);
        assert_eq!(scene.get(EntityId(3)).unwrap().position, Vec3::X * 3.0);
        assert!(scene.get(EntityId(4)).is_none());

        let order: Vec<u32> = scene.iter().map(|e| e.id.0).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn respawning_an_id_replaces_it() {
        let mut scene = Scene::new();
        let id = EntityId(7);
        assert!(scene.spawn(Entity::new(id).with_tag("mercury")).is_none());
        let old = scene.spawn(Entity::new(id).with_tag("venus")).unwrap();
        assert_eq!(old.tag, "mercury");
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(id).unwrap().tag, "venus");
    }

    #[test]
    fn get_mut_writes_through() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("earth"));
        scene.get_mut(EntityId(1)).unwrap().scale = 1.3;
        assert_eq!(scene.find_by_tag("earth").unwrap().scale, 1.3);
        assert!(scene.get_mut(EntityId(2)).is_none());
        assert!(scene.find_by_tag("pluto").is_none());

        scene.clear();
        assert!(scene.is_empty());
    }
}
