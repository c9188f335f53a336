use super::{
    mismatched, require_role, IntegrationConfig, IntegrationFragment, IntegrationGenerator,
    IntegrationKind, IntegrationResponse, IntegrationType, APPLICATION_JSON,
};
use crate::error::ConfigurationError;
use crate::route::Route;
use indexmap::IndexMap;
use serde_json::json;

const START_SYNC_EXECUTION_URI: &str =
    "arn:aws:apigateway:${region}:states:action/StartSyncExecution";
const START_EXECUTION_URI: &str = "arn:aws:apigateway:${region}:states:action/StartExecution";

/// Synchronous executions wait for the workflow; give them the gateway's
/// maximum integration timeout.
const SYNC_TIMEOUT_MILLIS: u32 = 29_000;

/// Unwraps the StartSyncExecution response envelope into the HTTP response.
const SYNC_OUTPUT_TEMPLATE: &str =
    "#set($output = $util.parseJson($input.path('$.output')))\n$output.body";

/// Synchronous workflow invocation via `StartSyncExecution`.
///
/// The workflow input is the JSON-serialized request body unless an input
/// template overrides it. The synchronous response envelope is unwrapped so
/// the caller sees the workflow output body, and the integration timeout is
/// raised to the gateway maximum.
pub struct StepFunctionSyncGenerator;

impl IntegrationGenerator for StepFunctionSyncGenerator {
    fn kind(&self) -> IntegrationKind {
        IntegrationKind::StepFunctionSync
    }

    fn generate(
        &self,
        route: &Route,
        config: &IntegrationConfig,
    ) -> Result<IntegrationFragment, ConfigurationError> {
        let IntegrationConfig::StepFunctionSync {
            state_machine_arn,
            input_template,
        } = config
        else {
            return Err(mismatched(self.kind(), config));
        };
        step_function_fragment(
            route,
            START_SYNC_EXECUTION_URI,
            state_machine_arn,
            input_template.clone(),
            true,
        )
    }
}

/// Fire-and-forget workflow invocation via `StartExecution`.
///
/// The response is the plain StartExecution acknowledgement; nothing is
/// unwrapped.
pub struct StepFunctionAsyncGenerator;

impl IntegrationGenerator for StepFunctionAsyncGenerator {
    fn kind(&self) -> IntegrationKind {
        IntegrationKind::StepFunctionAsync
    }

    fn generate(
        &self,
        route: &Route,
        config: &IntegrationConfig,
    ) -> Result<IntegrationFragment, ConfigurationError> {
        let IntegrationConfig::StepFunctionAsync {
            state_machine_arn,
            input_template,
        } = config
        else {
            return Err(mismatched(self.kind(), config));
        };
        step_function_fragment(
            route,
            START_EXECUTION_URI,
            state_machine_arn,
            input_template.clone(),
            false,
        )
    }
}

fn step_function_fragment(
    route: &Route,
    uri: &str,
    state_machine_arn: &str,
    input_template: Option<String>,
    sync: bool,
) -> Result<IntegrationFragment, ConfigurationError> {
    let credentials = require_role(route)?;

    let input = input_template.unwrap_or_else(|| "$input.json('$')".to_string());
    let body = json!({
        "input": input,
        "stateMachineArn": state_machine_arn,
        "region": "${region}",
    })
    .to_string();

    let mut request_templates = IndexMap::new();
    request_templates.insert(APPLICATION_JSON.to_string(), body);

    let mut default_response = IntegrationResponse::status("200");
    if sync {
        let mut templates = IndexMap::new();
        templates.insert(APPLICATION_JSON.to_string(), SYNC_OUTPUT_TEMPLATE.to_string());
        default_response.response_templates = Some(templates);
    }
    let mut responses = IndexMap::new();
    responses.insert("default".to_string(), default_response);

    Ok(IntegrationFragment {
        uri: Some(uri.to_string()),
        http_method: Some("POST".to_string()),
        integration_type: IntegrationType::Aws,
        credentials: Some(credentials),
        request_templates: Some(request_templates),
        request_parameters: None,
        responses,
        passthrough_behavior: None,
        timeout_in_millis: sync.then_some(SYNC_TIMEOUT_MILLIS),
    })
}
