pub mod assumptions {
    //! Assumptions when we don't have complete statistics available to us.

    /// Row count to use for a table that can't provide one.
    ///
    /// A heuristic, not derived from anything. Catalogs with real statistics
    /// should report those instead.
    pub const DEFAULT_ROW_COUNT: f64 = 10000.0;
}
