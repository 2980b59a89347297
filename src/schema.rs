/// Column-name constants for spool-tracekit frames.
/// Single source of truth - exported to Python via PyO3.

// ── MES export columns (raw) ────────────────────────────────────────────────
pub mod mes {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const STATE: &str = "state";
    pub const ARCHIVED: &str = "archived";
    pub const STATION: &str = "class_Station";
    pub const ISO_WORKBOOK_ID: &str = "var_ISOworkbookId";
    pub const WORKBOOK_TYPE: &str = "var_workBookType";
    pub const QUALITY_CLASS: &str = "class_Quality class";
    pub const PRESSURE_RISK: &str = "class_Pressure Risk Category";
    pub const INTERNAL_REV: &str = "var_ex_internal_rev";

    pub const REQUIRED: [&str; 7] = [
        STATE,
        ARCHIVED,
        STATION,
        ISO_WORKBOOK_ID,
        WORKBOOK_TYPE,
        QUALITY_CLASS,
        PRESSURE_RISK,
    ];
}

// ── Normalized spool columns ────────────────────────────────────────────────
pub mod spool {
    pub const ID: &str = "id";
    pub const ISO_WORKBOOK_ID: &str = "var_ISOworkbookId";
    pub const SPOOL_TYPE: &str = "var_workBookType";
    pub const STATION: &str = "class_Station";
    pub const STATE: &str = "state";
    pub const QUALITY_CLASS: &str = "quality_class";
    pub const PRESSURE_RISK: &str = "pressure_risk";
    pub const LABEL_TYPE: &str = "label_type";
    pub const IS_RED_LABEL: &str = "is_red_label";
    pub const INTERNAL_REV: &str = "var_ex_internal_rev";
    pub const TASK_COUNT: &str = "task_count";
}

// ── OP1 task export columns ─────────────────────────────────────────────────
pub mod task {
    pub const ORDER_ID: &str = "order_id";
    pub const TASK_NAME: &str = "task_name";
    pub const TASK_DESCRIPTION: &str = "task_description";
    pub const STATE: &str = "state";
    pub const ASSIGNED_GROUPS: &str = "assigned_Groups";
}

// ── Label type values ───────────────────────────────────────────────────────
pub mod label_type {
    pub const RED_LABEL: &str = "Red label";
    pub const STANDARD: &str = "Standard";
}

// ── Spool state values ──────────────────────────────────────────────────────
pub mod state {
    pub const COMPLETED: &str = "completed";
}

// ── Inspection load columns ─────────────────────────────────────────────────
pub mod load {
    pub const STATION: &str = "station";
    pub const WITNESS: &str = "witness";
    pub const HOLD: &str = "hold";
}

// ── Data-quality columns ────────────────────────────────────────────────────
pub mod quality {
    pub const ISO_WORKBOOK_ID: &str = "var_ISOworkbookId";
    pub const STATIONS: &str = "stations";
}

// ── Shopfloor occupancy columns ─────────────────────────────────────────────
pub mod occupancy {
    pub const STATION: &str = "station";
    pub const TOTAL_SPOOLS: &str = "total_spools";
    pub const RED_LABEL_SPOOLS: &str = "red_label_spools";
}
