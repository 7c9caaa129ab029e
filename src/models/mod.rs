pub mod action_plan;
pub mod community;
pub mod dataset;
pub mod environmental;
pub mod grievance;
pub mod investment;
pub mod record;
pub mod stakeholder;

pub use action_plan::ActionPlan;
pub use community::Community;
pub use dataset::Dataset;
pub use environmental::EnvironmentalSample;
pub use grievance::Grievance;
pub use investment::SocialInvestment;
pub use record::TableRecord;
pub use stakeholder::Stakeholder;
