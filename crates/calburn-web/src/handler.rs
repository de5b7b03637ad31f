//! Request Handler
//!
//! Orchestrates one request: parse the form, ask the model, persist the
//! record, and pick the view. Holds no per-request state; the model adapter
//! and the prediction log are supplied at construction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use calburn_core::errors::{CalburnError, ExError, Result};
use calburn_core::{log_op_end, log_op_error, log_op_start};
use calburn_core::{ModelAdapter, NewPrediction, PredictionLog, PredictionRecord};
use calburn_core_types::RequestContext;

use crate::form::parse_activity_form;
use crate::views;

/// The view selected for a request
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Input form, with the prediction text after a successful submission
    Index { prediction_text: Option<String> },
    /// All stored records, newest first
    History { records: Vec<PredictionRecord> },
}

impl View {
    pub fn render(&self) -> String {
        match self {
            View::Index { prediction_text } => views::render_index(prediction_text.as_deref()),
            View::History { records } => views::render_history(records),
        }
    }
}

#[derive(Clone)]
pub struct RequestHandler {
    model: ModelAdapter,
    log: Arc<dyn PredictionLog>,
}

impl RequestHandler {
    pub fn new(model: ModelAdapter, log: Arc<dyn PredictionLog>) -> Self {
        Self { model, log }
    }

    /// GET `/`: the empty form
    pub fn index(&self) -> View {
        View::Index {
            prediction_text: None,
        }
    }

    /// POST `/predict`
    ///
    /// On success exactly one record is appended to the log. Nothing is
    /// written when parsing or prediction fails.
    ///
    /// # Errors
    ///
    /// `FormParse` for a missing or malformed field, `Model` when the
    /// regressor fails, `Storage` when the record cannot be written. The
    /// error carries the request id.
    pub fn predict(
        &self,
        fields: &HashMap<String, String>,
        ctx: &RequestContext,
    ) -> Result<View> {
        self.observe_predict(ctx, || self.predict_inner(fields))
    }

    /// POST `/predict` whose body could not be decoded as a form
    ///
    /// Logged and reported like any other `FormParse` failure of `predict`.
    ///
    /// # Errors
    ///
    /// Always returns a `FormParse` error carrying the request id.
    pub fn predict_unreadable(&self, reason: &str, ctx: &RequestContext) -> Result<View> {
        self.observe_predict(ctx, || {
            Err(CalburnError::UnreadableForm {
                reason: reason.to_string(),
            }
            .into())
        })
    }

    fn observe_predict<F>(&self, ctx: &RequestContext, run: F) -> Result<View>
    where
        F: FnOnce() -> Result<f64>,
    {
        let start = Instant::now();
        log_op_start!("predict", request_id = %ctx.request_id);

        let result = run();
        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(prediction) => {
                log_op_end!(
                    "predict",
                    duration_ms = duration_ms,
                    request_id = %ctx.request_id,
                    prediction = prediction
                );
                Ok(View::Index {
                    prediction_text: Some(views::prediction_text(prediction)),
                })
            }
            Err(err) => {
                let err = err.with_request_id(ctx.request_id.clone());
                log_op_error!(
                    "predict",
                    err.clone(),
                    duration_ms = duration_ms,
                    request_id = %ctx.request_id
                );
                Err(err)
            }
        }
    }

    fn predict_inner(&self, fields: &HashMap<String, String>) -> Result<f64> {
        let input = parse_activity_form(fields).map_err(ExError::from)?;
        let prediction = self.model.predict_input(&input)?;
        self.log.insert(&NewPrediction::new(input, prediction))?;
        Ok(prediction)
    }

    /// GET `/history`
    ///
    /// # Errors
    ///
    /// `Storage` when the log cannot be read.
    pub fn history(&self, ctx: &RequestContext) -> Result<View> {
        let start = Instant::now();
        log_op_start!("history", request_id = %ctx.request_id);

        let result = self.log.list_all();
        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(records) => {
                log_op_end!(
                    "history",
                    duration_ms = duration_ms,
                    request_id = %ctx.request_id,
                    row_count = records.len()
                );
                Ok(View::History { records })
            }
            Err(err) => {
                let err = err.with_request_id(ctx.request_id.clone());
                log_op_error!(
                    "history",
                    err.clone(),
                    duration_ms = duration_ms,
                    request_id = %ctx.request_id
                );
                Err(err)
            }
        }
    }
}
