use std::sync::Arc;

use crate::checkin::CheckInEngine;
use crate::store::PgBookingStore;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CheckInEngine<PgBookingStore>>,
}
