//! AWS Elastic Load Balancing v2 backend.
//!
//! Enable with `--features aws` (on by default). Credentials come from the
//! environment (AWS_ACCESS_KEY_ID, etc.) or the default provider chain.

use aws_sdk_elasticloadbalancingv2::config::Region;
use aws_sdk_elasticloadbalancingv2::error::DisplayErrorContext;
use aws_sdk_elasticloadbalancingv2::types::{Action, ActionTypeEnum, RuleCondition};
use aws_sdk_elasticloadbalancingv2::Client;
use tracing::trace;

use super::rules::{Condition, ListenerRules, Rule};
use crate::error::{Result, RuleError};

/// Listener rules backed by the ELBv2 API.
///
/// The SDK is async; calls block on a current-thread runtime owned here.
pub struct AwsElb {
    rt: tokio::runtime::Runtime,
    client: Client,
}

impl AwsElb {
    /// Load AWS configuration for `region` and build a client.
    pub fn connect(region: &str) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RuleError::Runtime(e.to_string()))?;

        let region = Region::new(region.to_string());
        let config = rt.block_on(
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(region)
                .load(),
        );
        let client = Client::new(&config);

        Ok(Self { rt, client })
    }
}

fn condition(c: &RuleCondition) -> Condition {
    let mut values: Vec<String> = c.values().to_vec();
    if let Some(host) = c.host_header_config() {
        for v in host.values() {
            if !values.contains(v) {
                values.push(v.clone());
            }
        }
    }
    Condition::new(c.field().unwrap_or_default(), values)
}

impl ListenerRules for AwsElb {
    fn describe_rules(&self, listener_arn: &str) -> Result<Vec<Rule>> {
        trace!(listener = listener_arn, "describing rules");

        self.rt.block_on(async {
            let mut rules = Vec::new();
            let mut marker: Option<String> = None;

            loop {
                let page = self
                    .client
                    .describe_rules()
                    .listener_arn(listener_arn)
                    .set_marker(marker.take())
                    .send()
                    .await
                    .map_err(|e| RuleError::Describe(format!("{}", DisplayErrorContext(&e))))?;

                for rule in page.rules() {
                    let arn = rule.rule_arn().ok_or(RuleError::MissingArn)?;
                    rules.push(Rule {
                        arn: arn.to_string(),
                        conditions: rule.conditions().iter().map(condition).collect(),
                    });
                }

                match page.next_marker() {
                    Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                    _ => break,
                }
            }

            trace!(rules = rules.len(), "described rules");
            Ok(rules)
        })
    }

    fn forward_to(&self, rule_arn: &str, target_group_arn: &str) -> Result<()> {
        trace!(rule = rule_arn, target_group = target_group_arn, "modifying rule");

        let modify_err = |reason: String| RuleError::Modify {
            rule_arn: rule_arn.to_string(),
            reason,
        };

        let action = Action::builder()
            .r#type(ActionTypeEnum::Forward)
            .target_group_arn(target_group_arn)
            .build();

        self.rt.block_on(async {
            self.client
                .modify_rule()
                .rule_arn(rule_arn)
                .actions(action)
                .send()
                .await
                .map_err(|e| modify_err(format!("{}", DisplayErrorContext(&e))))?;
            Ok(())
        })
    }
}
