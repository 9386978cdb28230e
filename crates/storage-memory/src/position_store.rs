use async_trait::async_trait;
use moneta_core::errors::DatabaseError;
use moneta_core::positions::{
    ClosureLink, PositionError, PositionRepositoryTrait, PositionStatusFilter,
};
use moneta_core::{Position, Result};
use std::collections::HashMap;
use std::sync::RwLock;

/// Position and closure-link store.
#[derive(Default)]
pub struct MemoryPositionRepository {
    positions: RwLock<HashMap<String, Position>>,
    links: RwLock<Vec<ClosureLink>>,
}

impl MemoryPositionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionRepositoryTrait for MemoryPositionRepository {
    fn get_position(&self, position_id: &str) -> Result<Position> {
        self.positions
            .read()
            .expect("position store lock poisoned")
            .get(position_id)
            .cloned()
            .ok_or_else(|| PositionError::NotFound(position_id.to_string()).into())
    }

    fn get_position_by_name(&self, name: &str) -> Result<Option<Position>> {
        Ok(self
            .positions
            .read()
            .expect("position store lock poisoned")
            .values()
            .find(|p| p.name.as_deref() == Some(name))
            .cloned())
    }

    fn list_positions(&self, filter: PositionStatusFilter) -> Result<Vec<Position>> {
        let mut positions: Vec<Position> = self
            .positions
            .read()
            .expect("position store lock poisoned")
            .values()
            .filter(|p| match filter {
                PositionStatusFilter::Open => p.is_open,
                PositionStatusFilter::Closed => !p.is_open,
                PositionStatusFilter::All => true,
            })
            .cloned()
            .collect();
        positions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(positions)
    }

    async fn create_position(&self, position: Position) -> Result<Position> {
        let mut positions = self.positions.write().expect("position store lock poisoned");
        if positions.contains_key(&position.id) {
            return Err(DatabaseError::UniqueViolation(position.id.clone()).into());
        }
        positions.insert(position.id.clone(), position.clone());
        Ok(position)
    }

    async fn update_position(&self, position: Position) -> Result<Position> {
        let mut positions = self.positions.write().expect("position store lock poisoned");
        if !positions.contains_key(&position.id) {
            return Err(PositionError::NotFound(position.id.clone()).into());
        }
        positions.insert(position.id.clone(), position.clone());
        Ok(position)
    }

    async fn delete_position(&self, position_id: &str) -> Result<()> {
        let removed = self
            .positions
            .write()
            .expect("position store lock poisoned")
            .remove(position_id);
        match removed {
            Some(_) => Ok(()),
            None => Err(PositionError::NotFound(position_id.to_string()).into()),
        }
    }

    async fn create_closure_link(&self, link: ClosureLink) -> Result<ClosureLink> {
        let mut links = self.links.write().expect("position store lock poisoned");
        if links.iter().any(|l| l.id == link.id) {
            return Err(DatabaseError::UniqueViolation(link.id.clone()).into());
        }
        links.push(link.clone());
        Ok(link)
    }

    async fn update_closure_link(&self, link: ClosureLink) -> Result<ClosureLink> {
        let mut links = self.links.write().expect("position store lock poisoned");
        match links.iter_mut().find(|l| l.id == link.id) {
            Some(existing) => {
                *existing = link.clone();
                Ok(link)
            }
            None => Err(DatabaseError::NotFound(link.id.clone()).into()),
        }
    }

    fn get_links_by_deposit(&self, from_tx_id: &str) -> Result<Vec<ClosureLink>> {
        Ok(self
            .links
            .read()
            .expect("position store lock poisoned")
            .iter()
            .filter(|l| l.from_tx_id == from_tx_id)
            .cloned()
            .collect())
    }

    fn list_closure_links(&self) -> Result<Vec<ClosureLink>> {
        Ok(self
            .links
            .read()
            .expect("position store lock poisoned")
            .clone())
    }

    async fn delete_links_by_position(&self, position_id: &str) -> Result<()> {
        self.links
            .write()
            .expect("position store lock poisoned")
            .retain(|l| l.position_id != position_id);
        Ok(())
    }
}
