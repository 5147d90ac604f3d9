//! Listener rule lookup and repointing.
//!
//! Backends implement [`ListenerRules`]; the lookup and update logic here is
//! independent of the cloud SDK.

use tracing::{debug, info};

use crate::core::constants::HOST_HEADER_FIELD;
use crate::error::{Result, RuleError};

/// A match condition on a listener rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub values: Vec<String>,
}

impl Condition {
    pub fn new(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            values,
        }
    }

    /// Whether this is a host-header condition listing `host`.
    pub fn matches_host(&self, host: &str) -> bool {
        self.field == HOST_HEADER_FIELD && self.values.iter().any(|v| v == host)
    }
}

/// A listener rule as returned by the load balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub arn: String,
    pub conditions: Vec<Condition>,
}

/// Load-balancer operations needed to repoint a rule.
pub trait ListenerRules {
    /// All rules on the listener, in the order the service lists them.
    fn describe_rules(&self, listener_arn: &str) -> Result<Vec<Rule>>;

    /// Replace the rule's actions with a single forward to `target_group_arn`.
    fn forward_to(&self, rule_arn: &str, target_group_arn: &str) -> Result<()>;
}

/// First rule with a host-header condition listing `host`.
///
/// Ordering between several matching rules follows the listing order, which
/// the service does not guarantee.
pub fn find_rule<'a>(rules: &'a [Rule], host: &str) -> Option<&'a Rule> {
    rules
        .iter()
        .find(|rule| rule.conditions.iter().any(|c| c.matches_host(host)))
}

/// Point the rule matching `host` at `target_group_arn`.
///
/// Returns the ARN of the updated rule. When nothing matches no update is
/// attempted.
pub fn repoint(
    api: &dyn ListenerRules,
    listener_arn: &str,
    host: &str,
    target_group_arn: &str,
) -> Result<String> {
    let rules = api.describe_rules(listener_arn)?;
    debug!(listener = listener_arn, rules = rules.len(), "fetched rules");

    let rule = find_rule(&rules, host).ok_or_else(|| RuleError::NoMatch(host.to_string()))?;
    info!(rule = %rule.arn, host, "found matching rule");

    api.forward_to(&rule.arn, target_group_arn)?;
    info!(rule = %rule.arn, target_group = target_group_arn, "rule updated");
    Ok(rule.arn.clone())
}

/// In-memory listener for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MockListener {
    pub rules: Vec<Rule>,
    pub fail_describe: bool,
    pub fail_modify: bool,
    pub updates: std::cell::RefCell<Vec<(String, String)>>,
}

#[cfg(test)]
impl ListenerRules for MockListener {
    fn describe_rules(&self, _listener_arn: &str) -> Result<Vec<Rule>> {
        if self.fail_describe {
            return Err(RuleError::Describe("AccessDenied".to_string()).into());
        }
        Ok(self.rules.clone())
    }

    fn forward_to(&self, rule_arn: &str, target_group_arn: &str) -> Result<()> {
        self.updates
            .borrow_mut()
            .push((rule_arn.to_string(), target_group_arn.to_string()));
        if self.fail_modify {
            return Err(RuleError::Modify {
                rule_arn: rule_arn.to_string(),
                reason: "ValidationError".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
