//! Declarative endpoint table for the BambooHR gateway.
//!
//! # Design
//! Every operation is a `(verb, path template, body kind)` row in the
//! `endpoints!` table below. The macro expands the table into:
//! - the `Operation` enum with its static `Endpoint` definitions,
//! - a `build_*` method per operation on `BambooClient` (sans-IO),
//! - a same-named caller per operation on `Gateway` (builds, sends, parses).
//!
//! Templates are appended to the tenant base URL verbatim, including the
//! gateway's own irregularities (a doubled `/v1` on the dependent writes,
//! a missing separator on time off history, reads issued as PUT).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::client::{encode_body, BambooClient};
use crate::error::{ApiError, ArgumentError};
use crate::gateway::Gateway;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;

/// Whether an endpoint takes a JSON request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Empty,
}

/// Static definition of one gateway endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// Suffix template; `{name}` marks an identifier slot.
    pub path: &'static str,
    /// Identifier slots that must be filled.
    pub params: &'static [&'static str],
    /// Optional query parameters, appended in this order when present.
    pub query: &'static [&'static str],
    pub body: BodyKind,
}

impl Endpoint {
    /// Whether `name` is a path parameter or optional query parameter.
    pub fn accepts(&self, name: &str) -> bool {
        self.params.contains(&name) || self.query.contains(&name)
    }

    /// Render the URL suffix for `args`.
    ///
    /// Every value is interpolated as given, in the path part, in the
    /// template's own query part and in the optional query parameters alike.
    /// Optional query parameters follow in declared order.
    pub fn render(&self, args: &[(&str, &str)]) -> Result<String, ArgumentError> {
        if let Some((name, _)) = args.iter().find(|(name, _)| !self.accepts(name)) {
            return Err(ArgumentError::UnknownArgument(name.to_string()));
        }

        let mut out = String::with_capacity(self.path.len() + 16);
        fill(self.path, args, &mut out)?;

        let mut separator = if self.path.contains('?') { '&' } else { '?' };
        for name in self.query {
            if let Some(value) = lookup(args, name) {
                out.push(separator);
                out.push_str(name);
                out.push('=');
                out.push_str(value);
                separator = '&';
            }
        }
        Ok(out)
    }
}

fn lookup<'a>(args: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    args.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
}

/// Copy `template` into `out`, substituting every `{name}` slot.
fn fill(template: &'static str, args: &[(&str, &str)], out: &mut String) -> Result<(), ArgumentError> {
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(());
        };
        let name = &after[..close];
        out.push_str(lookup(args, name).ok_or(ArgumentError::MissingParameter(name))?);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(())
}

/// Returned by `Operation::from_str` for names outside the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation `{0}`")]
pub struct UnknownOperation(pub String);

macro_rules! endpoints {
    (@build Empty, $variant:ident, $build:ident, [$($param:ident),*], [$($opt:ident),*]) => {
        #[doc = concat!("Build the [`Operation::", stringify!($variant), "`] request.")]
        pub fn $build(&self, $($param: &str,)* $($opt: Option<&str>,)*) -> Result<HttpRequest, ApiError> {
            #[allow(unused_mut)]
            let mut args: Vec<(&str, &str)> = vec![$((stringify!($param), $param)),*];
            $(if let Some(value) = $opt {
                args.push((stringify!($opt), value));
            })*
            self.assemble(Operation::$variant, &args, None)
        }
    };
    (@build Json, $variant:ident, $build:ident, [$($param:ident),*], [$($opt:ident),*]) => {
        #[doc = concat!("Build the [`Operation::", stringify!($variant), "`] request with `body` as its JSON payload.")]
        pub fn $build<B: Serialize + ?Sized>(
            &self,
            $($param: &str,)*
            $($opt: Option<&str>,)*
            body: &B,
        ) -> Result<HttpRequest, ApiError> {
            #[allow(unused_mut)]
            let mut args: Vec<(&str, &str)> = vec![$((stringify!($param), $param)),*];
            $(if let Some(value) = $opt {
                args.push((stringify!($opt), value));
            })*
            let body = encode_body(body)?;
            self.assemble(Operation::$variant, &args, Some(body))
        }
    };
    (@call Empty, $variant:ident, $call:ident, $build:ident, [$($param:ident),*], [$($opt:ident),*]) => {
        #[doc = concat!("Perform [`Operation::", stringify!($variant), "`].")]
        pub fn $call(&self, $($param: &str,)* $($opt: Option<&str>,)*) -> Result<Value, ApiError> {
            let request = self.client().$build($($param,)* $($opt,)*)?;
            self.send(Operation::$variant, request)
        }
    };
    (@call Json, $variant:ident, $call:ident, $build:ident, [$($param:ident),*], [$($opt:ident),*]) => {
        #[doc = concat!("Perform [`Operation::", stringify!($variant), "`] with `body` as its JSON payload.")]
        pub fn $call<B: Serialize + ?Sized>(
            &self,
            $($param: &str,)*
            $($opt: Option<&str>,)*
            body: &B,
        ) -> Result<Value, ApiError> {
            let request = self.client().$build($($param,)* $($opt,)* body)?;
            self.send(Operation::$variant, request)
        }
    };
    ($(
        $(#[doc = $doc:literal])*
        $variant:ident: $call:ident / $build:ident => $method:ident $path:literal
            [$($param:ident),*] [$($opt:ident),*] $body:ident;
    )*) => {
        /// Every operation the gateway binding exposes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $($(#[doc = $doc])* $variant,)*
        }

        impl Operation {
            pub const ALL: &'static [Operation] = &[$(Operation::$variant),*];

            /// Snake-case name, as used by hosts and in logs.
            pub fn name(self) -> &'static str {
                match self {
                    $(Operation::$variant => stringify!($call),)*
                }
            }

            pub fn endpoint(self) -> Endpoint {
                match self {
                    $(Operation::$variant => Endpoint {
                        method: HttpMethod::$method,
                        path: $path,
                        params: &[$(stringify!($param)),*],
                        query: &[$(stringify!($opt)),*],
                        body: BodyKind::$body,
                    },)*
                }
            }
        }

        impl FromStr for Operation {
            type Err = UnknownOperation;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                match name {
                    $(stringify!($call) => Ok(Operation::$variant),)*
                    other => Err(UnknownOperation(other.to_string())),
                }
            }
        }

        impl BambooClient {
            $(endpoints!(@build $body, $variant, $build, [$($param),*], [$($opt),*]);)*
        }

        impl<T: Transport> Gateway<T> {
            $(endpoints!(@call $body, $variant, $call, $build, [$($param),*], [$($opt),*]);)*
        }
    };
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

endpoints! {
    /// Fetch one employee record, optionally limited to a comma-separated field list.
    GetEmployee: get_employee / build_get_employee => Get "/employees/{employee_id}/" [employee_id] [fields] Empty;
    /// Create an employee.
    AddEmployee: add_employee / build_add_employee => Post "/employees/" [] [] Json;
    /// Update fields on an existing employee.
    UpdateEmployee: update_employee / build_update_employee => Post "/employees/{employee_id}/" [employee_id] [] Json;
    /// Company-wide employee directory.
    GetEmployeeDirectory: get_employee_directory / build_get_employee_directory => Get "/employees/directory" [] [] Empty;
    /// Employee ids changed since an ISO-8601 timestamp.
    GetChangedEmployees: get_changed_employees / build_get_changed_employees => Get "/employees/changed/?since={since}" [since] [] Empty;
    /// Rows of one tabular field for an employee.
    GetEmployeeTable: get_employee_table / build_get_employee_table => Get "/employees/{employee_id}/tables/{table}" [employee_id, table] [] Empty;
    /// Append a row to an employee table.
    AddTableRow: add_table_row / build_add_table_row => Post "/employees/{employee_id}/tables/{table}" [employee_id, table] [] Json;
    /// Replace a row in an employee table.
    UpdateTableRow: update_table_row / build_update_table_row => Post "/employees/{employee_id}/tables/{table}/{row_id}" [employee_id, table, row_id] [] Json;
    /// Remove a row from an employee table.
    DeleteTableRow: delete_table_row / build_delete_table_row => Delete "/employees/{employee_id}/tables/{table}/{row_id}" [employee_id, table, row_id] [] Empty;
    /// Table rows changed since an ISO-8601 timestamp.
    GetChangedTable: get_changed_table / build_get_changed_table => Get "/employees/changed/tables/{table}?since={since}" [table, since] [] Empty;
    /// Run a saved company report.
    GetCompanyReport: get_company_report / build_get_company_report => Get "/reports/{report_id}?format=JSON" [report_id] [fd] Empty;
    /// Run an ad-hoc report over the given field list.
    RequestCustomReport: request_custom_report / build_request_custom_report => Post "/reports/custom?format=JSON" [] [] Json;
    /// File categories and files stored for an employee.
    ListEmployeeFiles: list_employee_files / build_list_employee_files => Get "/employees/{employee_id}/files/view/" [employee_id] [] Empty;
    /// Metadata for one employee file.
    GetEmployeeFile: get_employee_file / build_get_employee_file => Get "/employees/{employee_id}/files/{file_id}/" [employee_id, file_id] [] Empty;
    /// Rename, recategorize or reshare an employee file.
    UpdateEmployeeFile: update_employee_file / build_update_employee_file => Post "/employees/{employee_id}/files/{file_id}" [employee_id, file_id] [] Json;
    /// Delete an employee file.
    DeleteEmployeeFile: delete_employee_file / build_delete_employee_file => Delete "/employees/{employee_id}/files/{file_id}" [employee_id, file_id] [] Empty;
    /// Create employee file categories.
    AddEmployeeFileCategory: add_employee_file_category / build_add_employee_file_category => Post "/employees/files/categories/" [] [] Json;
    /// Company file categories and files.
    ListCompanyFiles: list_company_files / build_list_company_files => Get "/files/view/" [] [] Empty;
    /// Metadata for one company file.
    GetCompanyFile: get_company_file / build_get_company_file => Get "/files/{file_id}/" [file_id] [] Empty;
    /// Rename, recategorize or reshare a company file.
    UpdateCompanyFile: update_company_file / build_update_company_file => Post "/files/{file_id}" [file_id] [] Json;
    /// Delete a company file.
    DeleteCompanyFile: delete_company_file / build_delete_company_file => Delete "/files/{file_id}" [file_id] [] Empty;
    /// Create company file categories.
    AddCompanyFileCategory: add_company_file_category / build_add_company_file_category => Post "/files/categories/" [] [] Json;
    /// Every field the account exposes.
    GetFields: get_fields / build_get_fields => Get "/meta/fields/" [] [] Empty;
    /// Tabular field definitions.
    GetTabularFields: get_tabular_fields / build_get_tabular_fields => Get "/meta/tables/" [] [] Empty;
    /// List fields and their options.
    GetListFields: get_list_fields / build_get_list_fields => Get "/meta/lists/" [] [] Empty;
    /// Add or archive options on a list field.
    UpdateListFieldValues: update_list_field_values / build_update_list_field_values => Put "/meta/lists/{list_field_id}" [list_field_id] [] Json;
    /// Users with access to the account.
    GetUsers: get_users / build_get_users => Get "/meta/users/" [] [] Empty;
    /// Configured time off types.
    GetTimeOffTypes: get_time_off_types / build_get_time_off_types => Get "/meta/time_off/types/" [] [mode] Empty;
    /// Configured time off policies.
    GetTimeOffPolicies: get_time_off_policies / build_get_time_off_policies => Get "/meta/time_off/policies/" [] [] Empty;
    /// Time off requests overlapping a date range.
    GetTimeOffRequests: get_time_off_requests / build_get_time_off_requests => Get "/time_off/requests/?start={start}&end={end}" [start, end] [status, action] Empty;
    /// File a time off request for an employee.
    AddTimeOffRequest: add_time_off_request / build_add_time_off_request => Put "/employees/{employee_id}/time_off/request" [employee_id] [] Json;
    /// Approve, deny or cancel a time off request.
    ChangeTimeOffRequestStatus: change_time_off_request_status / build_change_time_off_request_status => Put "/time_off/requests/{request_id}/status" [request_id] [] Json;
    /// Record a historical time off entry.
    ///
    /// The path has no `/` between the employee id and `time_off`.
    AddTimeOffHistory: add_time_off_history / build_add_time_off_history => Put "/employees/{employee_id}time_off/history" [employee_id] [] Json;
    /// Adjust an employee's time off balance.
    AdjustTimeOffBalance: adjust_time_off_balance / build_adjust_time_off_balance => Put "/employees/{employee_id}/time_off/balance_adjustment" [employee_id] [] Json;
    /// Time off policies assigned to an employee.
    ListEmployeeTimeOffPolicies: list_employee_time_off_policies / build_list_employee_time_off_policies => Get "/employees/{employee_id}/time_off/policies" [employee_id] [] Empty;
    /// Assign time off policies to an employee.
    AssignTimeOffPolicies: assign_time_off_policies / build_assign_time_off_policies => Put "/employees/{employee_id}/time_off/policies" [employee_id] [] Json;
    /// Projected balances as of a future date. Issued as PUT.
    EstimateTimeOffBalances: estimate_time_off_balances / build_estimate_time_off_balances => Put "/employees/{employee_id}/time_off/calculator?end={end}" [employee_id, end] [] Empty;
    /// Who is out, defaulting to the next two weeks.
    GetWhosOut: get_whos_out / build_get_whos_out => Get "/time_off/whos_out/" [] [start, end] Empty;
    /// Benefit coverage levels.
    GetBenefitCoverages: get_benefit_coverages / build_get_benefit_coverages => Get "/benefitcoverages" [] [] Empty;
    /// Benefit deduction types.
    GetBenefitDeductionTypes: get_benefit_deduction_types / build_get_benefit_deduction_types => Get "/benefits/settings/deduction_types/all" [] [] Empty;
    /// Dependents of one employee.
    ListEmployeeDependents: list_employee_dependents / build_list_employee_dependents => Get "/employeedependents?employeeid={employee_id}" [employee_id] [] Empty;
    /// One dependent record.
    GetEmployeeDependent: get_employee_dependent / build_get_employee_dependent => Get "/employeedependents/{dependent_id}" [dependent_id] [] Empty;
    /// Create a dependent. The path repeats the `/v1` prefix.
    AddEmployeeDependent: add_employee_dependent / build_add_employee_dependent => Post "/v1/employeedependents" [] [] Json;
    /// Update a dependent. The path repeats the `/v1` prefix.
    UpdateEmployeeDependent: update_employee_dependent / build_update_employee_dependent => Put "/v1/employeedependents/{dependent_id}" [dependent_id] [] Json;
    /// Training types.
    ListTrainingTypes: list_training_types / build_list_training_types => Get "/training/type" [] [] Empty;
    /// Create a training type.
    AddTrainingType: add_training_type / build_add_training_type => Post "/training/type" [] [] Json;
    /// Update a training type.
    UpdateTrainingType: update_training_type / build_update_training_type => Put "/training/type/{training_type_id}" [training_type_id] [] Json;
    /// Delete a training type.
    DeleteTrainingType: delete_training_type / build_delete_training_type => Delete "/training/type/{training_type_id}" [training_type_id] [] Empty;
    /// Training categories.
    ListTrainingCategories: list_training_categories / build_list_training_categories => Get "/training/category" [] [] Empty;
    /// Training records for an employee.
    ListEmployeeTrainings: list_employee_trainings / build_list_employee_trainings => Get "/training/record/employee/{employee_id}" [employee_id] [] Empty;
    /// Add a training record for an employee.
    AddTrainingRecord: add_training_record / build_add_training_record => Post "/training/record/employee/{employee_id}" [employee_id] [] Json;
    /// Update a training record.
    UpdateTrainingRecord: update_training_record / build_update_training_record => Put "/training/record/{record_id}" [record_id] [] Json;
    /// Delete a training record.
    DeleteTrainingRecord: delete_training_record / build_delete_training_record => Delete "/training/record/{record_id}" [record_id] [] Empty;
    /// Goals for an employee.
    ListGoals: list_goals / build_list_goals => Get "/performance/employees/{employee_id}/goals" [employee_id] [filter] Empty;
    /// Create a goal for an employee.
    CreateGoal: create_goal / build_create_goal => Post "/performance/employees/{employee_id}/goals" [employee_id] [] Json;
    /// Replace a goal.
    UpdateGoal: update_goal / build_update_goal => Put "/performance/employees/{employee_id}/goals/{goal_id}" [employee_id, goal_id] [] Json;
    /// Delete a goal.
    DeleteGoal: delete_goal / build_delete_goal => Delete "/performance/employees/{employee_id}/goals/{goal_id}" [employee_id, goal_id] [] Empty;
    /// Goals, comments and filters in one read. Issued as PUT.
    GetGoalsAggregate: get_goals_aggregate / build_get_goals_aggregate => Put "/performance/employees/{employee_id}/goals/aggregate" [employee_id] [] Empty;
    /// Employees a goal can be shared with. Issued as PUT.
    GetGoalShareOptions: get_goal_share_options / build_get_goal_share_options => Put "/performance/employees/{employee_id}/goals/shareOptions" [employee_id] [] Empty;
    /// Webhooks owned by the API key's user.
    ListWebhooks: list_webhooks / build_list_webhooks => Get "/webhooks/" [] [] Empty;
    /// One webhook.
    GetWebhook: get_webhook / build_get_webhook => Get "/webhooks/{webhook_id}/" [webhook_id] [] Empty;
    /// Register a webhook.
    AddWebhook: add_webhook / build_add_webhook => Post "/webhooks/" [] [] Json;
    /// Replace a webhook.
    UpdateWebhook: update_webhook / build_update_webhook => Put "/webhooks/{webhook_id}/" [webhook_id] [] Json;
    /// Delete a webhook.
    DeleteWebhook: delete_webhook / build_delete_webhook => Delete "/webhooks/{webhook_id}/" [webhook_id] [] Empty;
    /// Recent deliveries for a webhook.
    GetWebhookLogs: get_webhook_logs / build_get_webhook_logs => Get "/webhooks/{webhook_id}/log" [webhook_id] [] Empty;
    /// Open and closed job openings.
    ListJobSummaries: list_job_summaries / build_list_job_summaries => Get "/applicant_tracking/jobs" [] [] Empty;
    /// Job applications, one page at a time.
    ListApplications: list_applications / build_list_applications => Get "/applicant_tracking/applications" [] [page, status] Empty;
    /// Details of one application.
    GetApplication: get_application / build_get_application => Get "/applicant_tracking/applications/{application_id}" [application_id] [] Empty;
    /// Comment on an application.
    AddApplicationComment: add_application_comment / build_add_application_comment => Post "/applicant_tracking/applications/{application_id}/comments" [application_id] [] Json;
    /// Move an application to another status.
    ChangeApplicantStatus: change_applicant_status / build_change_applicant_status => Post "/applicant_tracking/applications/{application_id}/status" [application_id] [] Json;
    /// Applicant statuses.
    ListApplicantStatuses: list_applicant_statuses / build_list_applicant_statuses => Get "/applicant_tracking/statuses" [] [] Empty;
}
