// View state for one user: the current report and how it is being looked at.
use tracing::error;

use crate::error::IntelError;
use crate::export::{to_workbook, Workbook};
use crate::intel::gather;
use crate::schema::{Report, RoomCategory};
use crate::sort::{project, SortConfig, SortKey};
use crate::source::ReportSource;
use crate::types::{AppStatus, GroundingSource, HotelQuery};

#[derive(Debug)]
pub struct Session {
    pub status: AppStatus,
    pub query: Option<HotelQuery>,
    pub report: Option<Report>,
    pub sources: Vec<GroundingSource>,
    pub sort: Option<SortConfig>,
    pub error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            status: AppStatus::Idle,
            query: None,
            report: None,
            sources: Vec::new(),
            sort: None,
            error: None,
        }
    }
}

impl Session {
    /// Run a search, replacing whatever was shown before.
    ///
    /// The previous report, sources, sort and error are dropped up front; on
    /// failure the session is left empty in the `Error` state.
    pub fn search(&mut self, source: &dyn ReportSource, query: HotelQuery) -> Result<(), IntelError> {
        self.status = AppStatus::Searching;
        self.error = None;
        self.report = None;
        self.sources.clear();
        self.sort = None;
        self.query = Some(query.clone());

        match gather(source, &query) {
            Ok(intel) => {
                self.report = Some(intel.report);
                self.sources = intel.sources;
                self.status = AppStatus::Completed;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "report search failed");
                self.error = Some(err.user_message().to_string());
                self.status = AppStatus::Error;
                Err(err)
            }
        }
    }

    pub fn request_sort(&mut self, key: SortKey) -> SortConfig {
        let next = SortConfig::toggle(self.sort, key);
        self.sort = Some(next);
        next
    }

    pub fn sorted_categories(&self) -> Vec<&RoomCategory> {
        match &self.report {
            Some(report) => project(&report.room_details.categories, self.sort),
            None => Vec::new(),
        }
    }

    pub fn workbook(&self) -> Option<Workbook> {
        self.report.as_ref().map(to_workbook)
    }
}
