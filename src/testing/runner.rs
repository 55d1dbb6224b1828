//! Ordered, dependency-aware execution of a suite's cases.
//!
//! Cases form a DAG through their prerequisites. Among cases whose
//! prerequisites have all completed, the lowest priority runs first and
//! declaration order breaks ties. A case whose prerequisite did not pass is
//! skipped without being executed. One `Session` is threaded through every
//! case of a run.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{CaseError, SuiteError};
use crate::http::{ApiRequest, ApiResponse, Transport};
use crate::session::Session;

use super::report::{CaseReport, Outcome, RunReport};

pub type CaseFuture<'a> = Pin<Box<dyn Future<Output = Result<(), CaseError>> + Send + 'a>>;

type CaseFn = Box<dyn for<'a> Fn(&'a mut CaseContext) -> CaseFuture<'a> + Send + Sync>;

/// Everything a case can touch while it runs.
pub struct CaseContext {
    http: Arc<dyn Transport>,
    pub session: Session,
    last_response: Option<ApiResponse>,
}

impl CaseContext {
    pub fn new(http: Arc<dyn Transport>) -> Self {
        Self {
            http,
            session: Session::new(),
            last_response: None,
        }
    }

    /// Send a request, attaching the session's access token when the request
    /// is marked authenticated.
    pub async fn send(&mut self, mut request: ApiRequest) -> Result<ApiResponse, CaseError> {
        if request.authenticated && request.bearer_token.is_none() {
            request.bearer_token = Some(self.session.access_token()?.to_string());
        }

        let method = request.method;
        let target = request.target();
        let response = self.http.send(request).await?;

        tracing::debug!(
            %method,
            %target,
            status = response.status,
            elapsed_ms = response.elapsed_ms,
            "response received"
        );
        tracing::debug!(body = %response.pretty_body(), "response body");

        self.last_response = Some(response.clone());
        Ok(response)
    }
}

pub struct Case {
    id: String,
    title: String,
    priority: i32,
    prerequisites: Vec<String>,
    run: CaseFn,
}

impl Case {
    pub fn new<F>(id: impl Into<String>, title: impl Into<String>, run: F) -> Self
    where
        F: for<'a> Fn(&'a mut CaseContext) -> CaseFuture<'a> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            title: title.into(),
            priority: 0,
            prerequisites: Vec::new(),
            run: Box::new(run),
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Run only after `prerequisite` has completed, and only if it passed.
    pub fn after(mut self, prerequisite: impl Into<String>) -> Self {
        self.prerequisites.push(prerequisite.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A validated, ordered set of cases.
pub struct Suite {
    name: String,
    cases: Vec<Case>,
    order: Vec<usize>,
}

impl Suite {
    pub fn new(name: impl Into<String>, cases: Vec<Case>) -> Result<Self, SuiteError> {
        let name = name.into();
        let order = plan(&name, &cases)?;
        Ok(Self { name, cases, order })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case ids in execution order.
    pub fn order(&self) -> Vec<&str> {
        self.order.iter().map(|&index| self.cases[index].id()).collect()
    }

    /// Execute every case once against a fresh session.
    pub async fn run(&self, http: Arc<dyn Transport>) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::new(&self.name);
        let mut cx = CaseContext::new(http);

        tracing::info!(suite = %self.name, cases = self.cases.len(), "suite started");

        for &index in &self.order {
            let case = &self.cases[index];
            let case_started = Instant::now();

            let blocker = case
                .prerequisites
                .iter()
                .find(|prerequisite| !report.outcome(prerequisite).is_some_and(Outcome::is_passed));

            let outcome = match blocker {
                Some(blocker) => {
                    tracing::warn!(suite = %self.name, case = %case.id, blocked_by = %blocker, "case skipped");
                    Outcome::Skipped {
                        blocked_by: blocker.clone(),
                    }
                }
                None => {
                    cx.last_response = None;
                    match (case.run)(&mut cx).await {
                        Ok(()) => {
                            tracing::info!(suite = %self.name, case = %case.id, "case passed");
                            Outcome::Passed
                        }
                        Err(err) => {
                            tracing::error!(suite = %self.name, case = %case.id, error = %err, "case failed");
                            Outcome::Failed {
                                reason: err.to_string(),
                                response_body: cx.last_response.take().map(|r| r.pretty_body()),
                            }
                        }
                    }
                }
            };

            report.record(CaseReport {
                id: case.id.clone(),
                title: case.title.clone(),
                outcome,
                duration_ms: case_started.elapsed().as_millis(),
            });
        }

        report.duration_ms = started.elapsed().as_millis();
        tracing::info!(
            suite = %self.name,
            passed = report.passed,
            failed = report.failed,
            skipped = report.skipped,
            duration_ms = report.duration_ms as u64,
            "suite finished"
        );
        report
    }
}

fn plan(suite: &str, cases: &[Case]) -> Result<Vec<usize>, SuiteError> {
    let mut index = HashMap::new();
    for (position, case) in cases.iter().enumerate() {
        if index.insert(case.id.as_str(), position).is_some() {
            return Err(SuiteError::DuplicateCase {
                suite: suite.to_string(),
                case: case.id.clone(),
            });
        }
    }

    let mut pending = vec![0usize; cases.len()];
    let mut dependents = vec![Vec::new(); cases.len()];
    for (position, case) in cases.iter().enumerate() {
        for prerequisite in &case.prerequisites {
            let &required = index.get(prerequisite.as_str()).ok_or_else(|| {
                SuiteError::UnknownPrerequisite {
                    case: case.id.clone(),
                    prerequisite: prerequisite.clone(),
                }
            })?;
            pending[position] += 1;
            dependents[required].push(position);
        }
    }

    let mut ready: BinaryHeap<Reverse<(i32, usize)>> = (0..cases.len())
        .filter(|&position| pending[position] == 0)
        .map(|position| Reverse((cases[position].priority, position)))
        .collect();

    let mut order = Vec::with_capacity(cases.len());
    while let Some(Reverse((_, position))) = ready.pop() {
        order.push(position);
        for &dependent in &dependents[position] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.push(Reverse((cases[dependent].priority, dependent)));
            }
        }
    }

    if order.len() != cases.len() {
        let stuck = (0..cases.len())
            .filter(|&position| pending[position] > 0)
            .map(|position| cases[position].id.clone())
            .collect();
        return Err(SuiteError::Cycle(stuck));
    }

    Ok(order)
}
