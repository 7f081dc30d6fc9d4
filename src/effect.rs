//! Effects - side effects declared by the reducer

/// Side effects that can be triggered by actions
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch one catalog page for the paginated view
    LoadPage { limit: u32, offset: u32 },
    /// Fetch the next catalog page for the load-more feed
    LoadFeedPage { limit: u32, offset: u32 },
    /// Fetch one detail record
    LoadDetail { id: u32 },
}
