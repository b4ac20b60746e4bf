//! Report DTOs.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for the monthly report endpoints.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthParams {
    /// Month, 1..=12.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
}
