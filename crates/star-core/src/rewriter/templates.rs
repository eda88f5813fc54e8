//! Fallback segment templates, keyed by domain.
//!
//! Templates never carry concrete numbers. Result templates use bracketed
//! placeholder metrics the user is expected to replace.

use crate::domain::Domain;
use crate::types::Component;

/// Placeholder injected when a Result segment has no metric.
pub const PLACEHOLDER_RESULT: &str =
    "This improved the key metric by [X%] and saved roughly [Y hours] per week.";

struct DomainTemplates {
    situation: &'static [&'static str],
    task: &'static [&'static str],
    action: &'static [&'static str],
    result: &'static [&'static str],
}

const TECHNICAL: DomainTemplates = DomainTemplates {
    situation: &[
        "Last year at [Company], we ran into a recurring problem with the {topic} that was affecting users.",
        "The issue surfaced during peak usage, when downtime had the most impact.",
    ],
    task: &[
        "I was responsible for finding the root cause and shipping a fix without disrupting users.",
        "I also needed to keep stakeholders informed while the work was in progress.",
    ],
    action: &[
        "I analyzed logs and error reports to narrow down where the {topic} was failing.",
        "I reproduced the issue in a staging environment and confirmed the root cause.",
        "I implemented a targeted fix and tested it before deploying to production.",
        "I monitored the {topic} afterwards to confirm the fix held.",
    ],
    result: &[
        "As a result, errors related to the {topic} fell by [X%].",
        "The fix saved the team roughly [Y hours] of firefighting each week.",
    ],
};

const LEADERSHIP: DomainTemplates = DomainTemplates {
    situation: &[
        "Last year at [Company], I was leading a {topic} facing a real challenge.",
        "Morale was low and commitments kept slipping.",
    ],
    task: &[
        "My goal was to get the {topic} aligned on priorities and delivering reliably again.",
        "I was responsible for doing that without losing anyone along the way.",
    ],
    action: &[
        "I met one-on-one with each member of the {topic} to understand their concerns.",
        "I facilitated a retrospective to surface communication gaps.",
        "I established clearer roles and a weekly check-in.",
        "I coached people through the changes and adjusted based on their feedback.",
    ],
    result: &[
        "As a result, the {topic} improved delivery predictability by [X%].",
        "Status meetings shrank, saving about [Y hours] per week across the group.",
    ],
};

const CONFLICT: DomainTemplates = DomainTemplates {
    situation: &[
        "Last year at [Company], I had a disagreement with a {topic} over how to approach a shared piece of work.",
        "The tension was starting to delay our deliverables.",
    ],
    task: &[
        "My goal was to resolve the conflict while keeping the work on track.",
        "I was responsible for protecting the working relationship as well as the outcome.",
    ],
    action: &[
        "I scheduled a private conversation with the {topic} to understand their perspective.",
        "I identified the goals we shared and proposed a compromise that addressed both concerns.",
        "I documented the agreement and checked in regularly afterwards.",
    ],
    result: &[
        "As a result, we delivered the work on time and cut rework by [X%].",
        "Our collaboration improved, saving roughly [Y hours] of back-and-forth each week.",
    ],
};

const DEADLINE: DomainTemplates = DomainTemplates {
    situation: &[
        "Last quarter at [Company], we faced a tight {topic} after the scope grew late in the schedule.",
        "Several team members were also out, which put the timeline at risk.",
    ],
    task: &[
        "I was responsible for replanning the work so we could hit the {topic} without sacrificing quality.",
        "My goal was to protect the essentials and defer anything optional.",
    ],
    action: &[
        "I analyzed the requirements and separated must-haves from nice-to-haves.",
        "I negotiated the reduced scope with stakeholders.",
        "I reorganized assignments around each person's strengths and tracked progress in daily check-ins.",
    ],
    result: &[
        "As a result, we delivered ahead of the {topic} with [X%] fewer defects than usual.",
        "The new process saved roughly [Y hours] on later releases.",
    ],
};

const PROJECT: DomainTemplates = DomainTemplates {
    situation: &[
        "Last year at [Company], I was working on a high-visibility {topic} that ran into unexpected constraints.",
        "The problem threatened both the timeline and stakeholder confidence.",
    ],
    task: &[
        "My task was to assess the constraints and keep the {topic} on track.",
        "I was responsible for managing stakeholder expectations throughout.",
    ],
    action: &[
        "I developed alternative approaches that worked within the constraints.",
        "I reviewed the options with stakeholders and prioritized the one with the least risk.",
        "I coordinated the rollout and tracked progress against milestones.",
    ],
    result: &[
        "As a result, the {topic} launched on schedule and improved adoption by [X%].",
        "The approach saved roughly [Y hours] of rework for the team.",
    ],
};

const GENERAL: DomainTemplates = DomainTemplates {
    situation: &[
        "Last year at [Company], we faced a {topic} that needed careful analysis and quick decisions.",
        "The situation was time-sensitive and affected several teams.",
    ],
    task: &[
        "I was responsible for leading the response and delivering a solution that addressed both immediate needs and long-term stability.",
    ],
    action: &[
        "I gathered data and input from the people closest to the problem.",
        "I analyzed the root causes and developed a few options.",
        "I implemented the chosen approach and monitored progress closely.",
    ],
    result: &[
        "As a result, we resolved the {topic} and improved the key metric by [X%].",
        "The changes saved roughly [Y hours] per week for the team.",
    ],
};

fn templates_for(domain: Domain) -> &'static DomainTemplates {
    match domain {
        Domain::Technical => &TECHNICAL,
        Domain::Leadership => &LEADERSHIP,
        Domain::Conflict => &CONFLICT,
        Domain::Deadline => &DEADLINE,
        Domain::Project => &PROJECT,
        Domain::General => &GENERAL,
    }
}

/// Template sentences for a component, with `{topic}` filled in.
pub fn segment_template(domain: Domain, component: Component, topic: &str) -> Vec<String> {
    let templates = templates_for(domain);
    let sentences = match component {
        Component::Situation => templates.situation,
        Component::Task => templates.task,
        Component::Action => templates.action,
        Component::Result => templates.result,
    };

    sentences.iter().map(|s| s.replace("{topic}", topic)).collect()
}
