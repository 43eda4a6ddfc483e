use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::Uri,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AppState;
use super::error::{ApiError, ErrorBody};
use crate::domain::{
    CallResource, ConferenceRoom, MessageBody, MessageResource, PhoneNumber, SpokenMessage,
};
use crate::service::{BatchReport, ItemOutcome, LookupResult, Recipient, ServiceError};

const MESSAGE: &str = "message";

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    service: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupBody {
    phone_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupsBody {
    phone_numbers: Vec<String>,
}

/// `{people: [...], message, roomName?}`; `roomName` is only read by `/conference`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleBody {
    people: Vec<Map<String, Value>>,
    message: String,
    #[serde(default)]
    room_name: Option<String>,
}

/// Batch results: a plain array when every item succeeded, tagged outcomes otherwise.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchResponse<R> {
    Completed(Vec<R>),
    Outcomes(Vec<OutcomeBody<R>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeBody<R> {
    Ok { index: usize, result: R },
    Failed { index: usize, error: ErrorBody },
}

impl<R> From<BatchReport<R, ServiceError>> for BatchResponse<R> {
    fn from(report: BatchReport<R, ServiceError>) -> Self {
        match report {
            BatchReport::Completed(results) => Self::Completed(results),
            BatchReport::Outcomes(outcomes) => Self::Outcomes(
                outcomes
                    .into_iter()
                    .map(|outcome| match outcome {
                        ItemOutcome::Ok { index, result } => OutcomeBody::Ok { index, result },
                        ItemOutcome::Failed { index, error } => OutcomeBody::Failed {
                            index,
                            error: ErrorBody::from(&error),
                        },
                    })
                    .collect(),
            ),
        }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
    })
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_owned())
}

pub async fn lookup(
    State(state): State<AppState>,
    body: Result<Json<LookupBody>, JsonRejection>,
) -> Result<Json<LookupResult>, ApiError> {
    let Json(body) = body?;
    let number = PhoneNumber::parse(body.phone_number)?;
    Ok(Json(state.lookup.lookup(number).await?))
}

pub async fn lookups(
    State(state): State<AppState>,
    body: Result<Json<LookupsBody>, JsonRejection>,
) -> Result<Json<BatchResponse<LookupResult>>, ApiError> {
    let Json(body) = body?;
    let numbers = body
        .phone_numbers
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            PhoneNumber::parse(raw)
                .map_err(|err| ApiError::InvalidRequest(format!("phoneNumbers[{index}]: {err}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let report = state.lookup.lookup_many(numbers).await?;
    Ok(Json(report.into()))
}

pub async fn sms(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<MessageResource>, ApiError> {
    let Json(body) = body?;
    let (recipient, message) = single_recipient(body)?;
    let communication = &state.communication;
    let resource = if communication.settings().template_single {
        communication
            .send_personalized_message(&recipient, &message)
            .await?
    } else {
        let body = MessageBody::new(message)?;
        communication
            .send_message(recipient.phone_number().clone(), body)
            .await?
    };
    Ok(Json(resource))
}

pub async fn broadcast_sms(
    State(state): State<AppState>,
    body: Result<Json<PeopleBody>, JsonRejection>,
) -> Result<Json<BatchResponse<MessageResource>>, ApiError> {
    let Json(body) = body?;
    let people = recipients(body.people)?;
    let report = state
        .communication
        .broadcast_sms(people, &body.message)
        .await?;
    Ok(Json(report.into()))
}

pub async fn call(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<CallResource>, ApiError> {
    let Json(body) = body?;
    let (recipient, message) = single_recipient(body)?;
    let communication = &state.communication;
    let resource = if communication.settings().template_single {
        communication
            .place_personalized_call(&recipient, &message)
            .await?
    } else {
        let spoken = SpokenMessage::new(message)?;
        communication
            .place_announcement_call(recipient.phone_number().clone(), spoken)
            .await?
    };
    Ok(Json(resource))
}

pub async fn calls(
    State(state): State<AppState>,
    body: Result<Json<PeopleBody>, JsonRejection>,
) -> Result<Json<BatchResponse<CallResource>>, ApiError> {
    let Json(body) = body?;
    let people = recipients(body.people)?;
    let report = state
        .communication
        .announce_calls(people, &body.message)
        .await?;
    Ok(Json(report.into()))
}

pub async fn conference(
    State(state): State<AppState>,
    body: Result<Json<PeopleBody>, JsonRejection>,
) -> Result<Json<BatchResponse<CallResource>>, ApiError> {
    let Json(body) = body?;
    let room = body.room_name.map(ConferenceRoom::new).transpose()?;
    let people = recipients(body.people)?;
    let report = state
        .communication
        .conference_calls(people, &body.message, room)
        .await?;
    Ok(Json(report.into()))
}

/// Split a `{..recipient fields, message}` body into the recipient and its message.
fn single_recipient(mut body: Map<String, Value>) -> Result<(Recipient, String), ApiError> {
    let message = match body.remove(MESSAGE) {
        Some(Value::String(message)) => message,
        Some(_) => return Err(ApiError::InvalidRequest("message must be a string".to_owned())),
        None => return Err(ApiError::InvalidRequest("missing field `message`".to_owned())),
    };
    Ok((Recipient::from_json(body)?, message))
}

fn recipients(people: Vec<Map<String, Value>>) -> Result<Vec<Recipient>, ApiError> {
    people
        .into_iter()
        .enumerate()
        .map(|(index, person)| {
            Recipient::from_json(person)
                .map_err(|err| ApiError::InvalidRequest(format!("people[{index}]: {err}")))
        })
        .collect()
}
