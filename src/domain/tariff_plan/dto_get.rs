use super::{PublicationState, SortOrder, TariffPlanSortField};
use crate::shared::PageRequest;

/// Admin list query: optional state filter, sorting and paging
#[derive(Debug, Clone, Default)]
pub struct GetTariffPlansDto {
    pub state: Option<PublicationState>,
    pub sort_by: TariffPlanSortField,
    pub order: SortOrder,
    pub page: PageRequest,
}
