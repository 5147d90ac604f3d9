//! Update-rule command - repoint a listener rule to a new target group.

use crate::cli::UpdateRuleArgs;
use crate::error::Result;

/// Find the rule for the host header and forward it to the target group.
#[cfg(feature = "aws")]
pub fn execute(args: UpdateRuleArgs) -> Result<()> {
    use tracing::info;

    use crate::cli::output;
    use crate::core::elb::AwsElb;
    use crate::core::rules;

    info!(region = %args.region, listener = %args.listener_arn, "connecting");
    let elb = AwsElb::connect(&args.region)?;

    let rule_arn = rules::repoint(
        &elb,
        &args.listener_arn,
        &args.host_header,
        &args.target_group_arn,
    )?;

    output::success(&format!("found matching rule: {}", rule_arn));
    output::success(&format!(
        "updated rule to use target group: {}",
        args.target_group_arn
    ));
    Ok(())
}

#[cfg(not(feature = "aws"))]
pub fn execute(_args: UpdateRuleArgs) -> Result<()> {
    Err(crate::error::RuleError::Unsupported.into())
}
