use chrono::{Duration, NaiveDate};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{
    ActionPlan, Community, Dataset, EnvironmentalSample, Grievance, SocialInvestment, Stakeholder,
};
use crate::store::schema::SchemaVariant;
use crate::utils::constants::*;

/// Number of rows to generate per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DatasetSizes {
    #[validate(range(min = 1))]
    pub communities: usize,

    #[validate(range(min = 1))]
    pub stakeholders: usize,

    #[validate(range(min = 1))]
    pub grievances: usize,

    pub action_plans: usize,
    pub environmental_samples: usize,
    pub social_investments: usize,
}

impl Default for DatasetSizes {
    fn default() -> Self {
        Self {
            communities: NUM_COMMUNITIES,
            stakeholders: NUM_STAKEHOLDERS,
            grievances: NUM_GRIEVANCES,
            action_plans: NUM_ACTIONS,
            environmental_samples: NUM_ENV_SAMPLES,
            social_investments: NUM_INVESTMENTS,
        }
    }
}

/// Builds the raw dataset with its defects injected by construction.
pub struct SyntheticGenerator {
    sizes: DatasetSizes,
    start_date: NaiveDate,
    variant: SchemaVariant,
    seed: Option<u64>,
}

impl SyntheticGenerator {
    pub fn new(sizes: DatasetSizes, start_date: NaiveDate, variant: SchemaVariant) -> Self {
        Self {
            sizes,
            start_date,
            variant,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn generate(&self) -> Result<Dataset> {
        self.sizes.validate()?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut dataset = Dataset::new(self.variant);
        dataset.communities = self.generate_communities(&mut rng);
        dataset.stakeholders = self.generate_stakeholders(&mut rng, &dataset.communities);
        dataset.grievances = self.generate_grievances(&mut rng, &dataset.stakeholders)?;
        dataset.action_plans = self.generate_action_plans(&mut rng, &dataset.grievances);
        dataset.environmental_samples =
            self.generate_environmental_samples(&mut rng, &dataset.communities);
        dataset.social_investments =
            self.generate_social_investments(&mut rng, &dataset.communities);

        info!(
            rows = dataset.total_rows(),
            variant = %self.variant,
            seed = ?self.seed,
            "Generated raw dataset"
        );

        Ok(dataset)
    }

    fn generate_communities(&self, rng: &mut StdRng) -> Vec<Community> {
        (1..=self.sizes.communities)
            .map(|i| {
                let letter = char::from(b'A' + (i % 26) as u8);
                let population = if rng.gen_bool(0.5) {
                    rng.gen_range(MIN_VALID_POPULATION..=MAX_VALID_POPULATION)
                } else {
                    INVALID_POPULATION
                };

                Community::new(
                    format!("COM-{:03}", i),
                    format!(" Village_{}{} ", letter, i),
                    pick(rng, &PREFECTURES),
                    population,
                    pick(rng, &RISK_LEVELS),
                )
            })
            .collect()
    }

    fn generate_stakeholders(
        &self,
        rng: &mut StdRng,
        communities: &[Community],
    ) -> Vec<Stakeholder> {
        (1..=self.sizes.stakeholders)
            .map(|i| {
                let community = &communities[rng.gen_range(0..communities.len())];
                Stakeholder::new(
                    format!("STK-{:03}", i),
                    format!(" stakeholder_name_{} ", i),
                    pick(rng, &ROLES),
                    community.community_id.clone(),
                )
            })
            .collect()
    }

    fn generate_grievances(
        &self,
        rng: &mut StdRng,
        stakeholders: &[Stakeholder],
    ) -> Result<Vec<Grievance>> {
        let status_dist = WeightedIndex::new(GRIEVANCE_STATUS_WEIGHTS)
            .map_err(|e| ProcessingError::Generation(e.to_string()))?;

        let mut grievances = Vec::with_capacity(self.sizes.grievances);
        for i in 1..=self.sizes.grievances {
            let logged = self.start_date + Duration::days(rng.gen_range(0..=LOGGING_WINDOW_DAYS));
            let stakeholder = &stakeholders[rng.gen_range(0..stakeholders.len())];
            let status = GRIEVANCE_STATUSES[status_dist.sample(rng)];

            let closing = (status == STATUS_CLOSED).then(|| {
                logged
                    + Duration::days(
                        rng.gen_range(MIN_CLOSING_OFFSET_DAYS..=MAX_CLOSING_OFFSET_DAYS),
                    )
            });

            let community_id = self
                .variant
                .is_extended()
                .then(|| stakeholder.community_id.clone());

            let category = pick(rng, &RAW_CATEGORIES);
            let severity = pick(rng, &SEVERITIES);
            let estimated_cost = match rng.gen_range(0..3) {
                0 => Some(rng.gen_range(0..=MAX_VALID_COST)),
                1 => Some(INVALID_COST),
                _ => None,
            };

            grievances.push(Grievance::new(
                format!("GRV-{:05}", i),
                logged,
                stakeholder.stakeholder_id.clone(),
                community_id,
                category,
                severity,
                status,
                closing,
                estimated_cost,
            ));
        }

        debug!(count = grievances.len(), "Generated grievances");
        Ok(grievances)
    }

    fn generate_action_plans(&self, rng: &mut StdRng, grievances: &[Grievance]) -> Vec<ActionPlan> {
        (1..=self.sizes.action_plans)
            .map(|i| {
                let grievance = &grievances[rng.gen_range(0..grievances.len())];
                ActionPlan::new(
                    format!("ACT-{:05}", i),
                    grievance.grievance_id.clone(),
                    pick(rng, &DEPARTMENTS),
                    pick(rng, &ACTION_STATUSES),
                )
            })
            .collect()
    }

    fn generate_environmental_samples(
        &self,
        rng: &mut StdRng,
        communities: &[Community],
    ) -> Vec<EnvironmentalSample> {
        (1..=self.sizes.environmental_samples)
            .map(|i| {
                let community = &communities[rng.gen_range(0..communities.len())];
                let noise_db = if rng.gen_bool(0.5) {
                    round_to(rng.gen_range(MIN_NORMAL_NOISE_DB..MAX_NORMAL_NOISE_DB), 1)
                } else {
                    OUTLIER_NOISE_DB
                };
                let dust_pm10 = self
                    .variant
                    .is_extended()
                    .then(|| round_to(rng.gen_range(MIN_DUST_PM10..MAX_DUST_PM10), 2));

                EnvironmentalSample::new(
                    format!("ENV-{:05}", i),
                    community.community_id.clone(),
                    noise_db,
                    dust_pm10,
                )
            })
            .collect()
    }

    fn generate_social_investments(
        &self,
        rng: &mut StdRng,
        communities: &[Community],
    ) -> Vec<SocialInvestment> {
        (1..=self.sizes.social_investments)
            .map(|i| {
                let community = &communities[rng.gen_range(0..communities.len())];
                let theme = pick(rng, &RAW_THEMES);
                let budget_usd = if rng.gen_bool(0.5) {
                    rng.gen_range(MIN_VALID_BUDGET..=MAX_VALID_BUDGET)
                } else {
                    INVALID_BUDGET
                };
                let year = self
                    .variant
                    .is_extended()
                    .then(|| INVESTMENT_YEARS[rng.gen_range(0..INVESTMENT_YEARS.len())]);

                SocialInvestment::new(
                    format!("SOC-{:04}", i),
                    community.community_id.clone(),
                    theme,
                    budget_usd,
                    year,
                )
            })
            .collect()
    }
}

fn pick<R: Rng>(rng: &mut R, domain: &[&'static str]) -> &'static str {
    domain[rng.gen_range(0..domain.len())]
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
