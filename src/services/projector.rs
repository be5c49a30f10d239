//! Grouped board view
//!
//! Partitions a flat item list by status. Used by the list endpoint and by
//! the client-side board cache, which edits the grouped view in place.

use crate::models::investment::{GroupedItems, InvestmentItem, ItemStatus};

/// Partition `items` by status, keeping input order inside each column.
pub fn project(items: impl IntoIterator<Item = InvestmentItem>) -> GroupedItems {
    let mut grouped = GroupedItems::default();
    for item in items {
        grouped.partition_mut(item.status).push(item);
    }
    grouped
}

impl GroupedItems {
    pub fn partition(&self, status: ItemStatus) -> &[InvestmentItem] {
        match status {
            ItemStatus::FollowUp => &self.follow_up,
            ItemStatus::Executed => &self.executed,
            ItemStatus::Closed => &self.closed,
            ItemStatus::Archive => &self.archive,
        }
    }

    pub fn partition_mut(&mut self, status: ItemStatus) -> &mut Vec<InvestmentItem> {
        match status {
            ItemStatus::FollowUp => &mut self.follow_up,
            ItemStatus::Executed => &mut self.executed,
            ItemStatus::Closed => &mut self.closed,
            ItemStatus::Archive => &mut self.archive,
        }
    }

    /// Column and index of the item with `id`
    pub fn position(&self, id: &str) -> Option<(ItemStatus, usize)> {
        ItemStatus::ALL.into_iter().find_map(|status| {
            self.partition(status)
                .iter()
                .position(|item| item.id == id)
                .map(|index| (status, index))
        })
    }

    pub fn find(&self, id: &str) -> Option<&InvestmentItem> {
        self.position(id)
            .map(|(status, index)| &self.partition(status)[index])
    }

    /// Take the item out of whichever column holds it
    pub fn remove(&mut self, id: &str) -> Option<(ItemStatus, usize, InvestmentItem)> {
        let (status, index) = self.position(id)?;
        let item = self.partition_mut(status).remove(index);
        Some((status, index, item))
    }

    /// Put the item at the top of the column named by its status
    pub fn prepend(&mut self, item: InvestmentItem) {
        self.partition_mut(item.status).insert(0, item);
    }

    /// Insert at `index`, clamped to the column length
    pub fn insert_at(&mut self, status: ItemStatus, index: usize, item: InvestmentItem) {
        let column = self.partition_mut(status);
        let index = index.min(column.len());
        column.insert(index, item);
    }

    pub fn len(&self) -> usize {
        ItemStatus::ALL
            .into_iter()
            .map(|status| self.partition(status).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &InvestmentItem> {
        ItemStatus::ALL
            .into_iter()
            .flat_map(move |status| self.partition(status).iter())
    }
}
