use std::sync::Arc;

use serde::Serialize;

use super::ServiceError;
use super::dispatch::{BatchError, BatchReport, Dispatcher};
use super::provider::TelephonyProvider;
use crate::domain::{LineTypeIntelligence, LookupField, LookupRecord, LookupRequest, PhoneNumber};

/// Caller name and line classification for one number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub caller_id: Option<String>,
    pub line_type: Option<LineTypeIntelligence>,
}

impl From<LookupRecord> for LookupResult {
    fn from(record: LookupRecord) -> Self {
        Self {
            caller_id: record.caller_name.and_then(|name| name.caller_name),
            line_type: record.line_type_intelligence,
        }
    }
}

/// Read-only number lookups against the provider.
#[derive(Clone)]
pub struct LookupService {
    provider: Arc<dyn TelephonyProvider>,
    dispatcher: Dispatcher,
}

impl LookupService {
    pub fn new(provider: Arc<dyn TelephonyProvider>, dispatcher: Dispatcher) -> Self {
        Self {
            provider,
            dispatcher,
        }
    }

    /// Caller name and line type of one number, fetched in a single query.
    pub async fn lookup(&self, number: PhoneNumber) -> Result<LookupResult, ServiceError> {
        let record = self
            .query(
                number,
                &[LookupField::CallerName, LookupField::LineTypeIntelligence],
            )
            .await?;
        Ok(record.into())
    }

    /// [`LookupService::lookup`] for every number, under the configured batch policy.
    pub async fn lookup_many(
        &self,
        numbers: Vec<PhoneNumber>,
    ) -> Result<BatchReport<LookupResult, ServiceError>, BatchError<ServiceError>> {
        tracing::info!(count = numbers.len(), "looking up numbers");
        self.dispatcher
            .run(numbers, |number| self.lookup(number))
            .await
    }

    /// Caller names, one per input number, in input order. Fails on the first bad number.
    pub async fn resolve_caller_names(
        &self,
        numbers: Vec<PhoneNumber>,
    ) -> Result<Vec<Option<String>>, BatchError<ServiceError>> {
        self.dispatcher
            .try_all(numbers, |number| async move {
                let record = self.query(number, &[LookupField::CallerName]).await?;
                Ok(record.caller_name.and_then(|name| name.caller_name))
            })
            .await
    }

    /// Line-type classifications, one per input number, in input order.
    pub async fn resolve_line_types(
        &self,
        numbers: Vec<PhoneNumber>,
    ) -> Result<Vec<Option<LineTypeIntelligence>>, BatchError<ServiceError>> {
        self.dispatcher
            .try_all(numbers, |number| async move {
                let record = self
                    .query(number, &[LookupField::LineTypeIntelligence])
                    .await?;
                Ok(record.line_type_intelligence)
            })
            .await
    }

    async fn query(
        &self,
        number: PhoneNumber,
        fields: &[LookupField],
    ) -> Result<LookupRecord, ServiceError> {
        tracing::debug!(number = %number, ?fields, "lookup query");
        let request = LookupRequest::new(number, fields.iter().copied());
        Ok(self.provider.lookup(request).await?)
    }
}
