use async_trait::async_trait;

use haulbook_core::{PartyId, TruckId};
use haulbook_ledger::{DateRange, LedgerKind, LedgerResponse};

use crate::api::ApiClient;
use crate::error::ClientResult;

/// Which statement to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerTarget {
    Party(PartyId),
    Truck(TruckId),
}

impl LedgerTarget {
    pub fn kind(&self) -> LedgerKind {
        match self {
            LedgerTarget::Party(_) => LedgerKind::Party,
            LedgerTarget::Truck(_) => LedgerKind::Truck,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            LedgerTarget::Party(id) => id.get(),
            LedgerTarget::Truck(id) => id.get(),
        }
    }
}

impl core::fmt::Display for LedgerTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.kind().as_str(), self.id())
    }
}

/// Anything that can produce a ledger statement.
///
/// The console views are generic over this so they can be driven by a
/// scripted source in tests.
#[async_trait]
pub trait LedgerSource: Send + Sync + 'static {
    async fn fetch_ledger(&self, target: LedgerTarget, range: DateRange) -> ClientResult<LedgerResponse>;
}

#[async_trait]
impl LedgerSource for ApiClient {
    async fn fetch_ledger(&self, target: LedgerTarget, range: DateRange) -> ClientResult<LedgerResponse> {
        match target {
            LedgerTarget::Party(id) => self.party_ledger(id, range).await,
            LedgerTarget::Truck(id) => self.truck_ledger(id, range).await,
        }
    }
}
