//! Built-in labelled examples the text model is fitted on at startup.

use super::entities::Intent;

/// Labelled example set, one entry per classifiable intent.
pub fn builtin_examples() -> Vec<(Intent, &'static [&'static str])> {
    vec![
        (Intent::CropRecommendation, CROP_RECOMMENDATION),
        (Intent::MarketYield, MARKET_YIELD),
        (Intent::RiskAssessment, RISK_ASSESSMENT),
        (Intent::PestDetection, PEST_DETECTION),
        (Intent::FinanceAgent, FINANCE_AGENT),
    ]
}

const CROP_RECOMMENDATION: &[&str] = &[
    "What crop should I plant?",
    "Which crop is best for my soil?",
    "Recommend a crop for sandy soil",
    "What to grow in acidic soil?",
    "Best crop for high humidity area",
    "Crop recommendation for pH 6.5",
    "What should I plant this season?",
    "Which crop gives good yield in my climate?",
    "Suggest crops for nitrogen rich soil",
    "What crop is suitable for 25°C temperature?",
    // soil
    "My soil has high nitrogen, what to plant?",
    "Low phosphorus soil crop suggestions",
    "Potassium deficient soil recommendations",
    "Clay soil best crops",
    "Sandy loam soil crop options",
    "Alkaline soil suitable crops",
    "Waterlogged soil crop choices",
    "Drought resistant crop suggestions",
    // climate
    "Crops for tropical climate",
    "Cold weather crop recommendations",
    "Monsoon season planting advice",
    "Summer crop suggestions",
    "Winter farming options",
    "High rainfall area crops",
    "Low water requirement crops",
    "Heat tolerant crop varieties",
    // farm conditions
    "Crops for small farm",
    "High profit margin crops",
    "Quick growing crop options",
    "Organic farming crop suggestions",
    "Intercropping recommendations",
    "Crop rotation suggestions",
    "First time farmer crop advice",
    "Sustainable farming crops",
];

const MARKET_YIELD: &[&str] = &[
    "What will be the price of wheat next month?",
    "Predict rice prices for this season",
    "Market forecast for corn",
    "Expected price trends for soybeans",
    "Will tomato prices increase?",
    "Price analysis for cotton",
    "Market outlook for sugarcane",
    "Commodity price predictions",
    // yield
    "How much yield can I expect?",
    "Predict my crop yield",
    "Expected harvest from 5 acres",
    "Yield forecast for wheat",
    "Production estimate for rice",
    "Harvest prediction for corn",
    "Expected output per hectare",
    "Crop productivity analysis",
    // market analysis
    "Market demand for vegetables",
    "Supply chain analysis",
    "Best time to sell crops",
    "Market trends for fruits",
    "Export opportunities for grains",
    "Local market prices",
    "Wholesale vs retail pricing",
    "Seasonal price variations",
    // economics
    "Profit margin analysis",
    "Cost-benefit of growing wheat",
    "Return on investment for farming",
    "Break-even analysis for crops",
    "Financial planning for harvest",
    "Revenue projections",
    "Market value assessment",
    "Economic viability study",
];

const RISK_ASSESSMENT: &[&str] = &[
    "What are the weather risks for my crop?",
    "Drought risk assessment",
    "Flood probability this season",
    "Climate change impact on farming",
    "Weather forecast for farming",
    "Risk of extreme temperatures",
    "Monsoon delay effects",
    "Heatwave impact on crops",
    // environment
    "Soil erosion risk factors",
    "Water scarcity assessment",
    "Pollution impact on crops",
    "Air quality effects on farming",
    "Groundwater depletion risks",
    "Salinity risk in soil",
    "Contamination assessment",
    "Environmental hazards",
    // agriculture
    "Crop failure probability",
    "Pest outbreak risk",
    "Disease spread likelihood",
    "Market volatility risks",
    "Supply chain disruptions",
    "Input cost fluctuations",
    "Labor shortage risks",
    "Technology adoption risks",
    // mitigation
    "Crop insurance recommendations",
    "Risk mitigation strategies",
    "Disaster preparedness for farms",
    "Emergency response planning",
    "Risk management techniques",
    "Preventive measures for crops",
    "Safety protocols for farming",
    "Contingency planning advice",
];

const PEST_DETECTION: &[&str] = &[
    "What pest is this?",
    "Identify this bug on my plant",
    "What's eating my crops?",
    "Pest identification help",
    "Bug recognition service",
    "Insect classification",
    "Parasite detection",
    "Harmful pest identification",
    // disease
    "What disease does my plant have?",
    "Identify plant disease",
    "Crop disease diagnosis",
    "Fungal infection identification",
    "Bacterial disease detection",
    "Viral disease symptoms",
    "Plant pathology help",
    "Disease classification service",
    // damage
    "Assess crop damage",
    "Evaluate pest damage",
    "Disease severity analysis",
    "Infestation level assessment",
    "Crop health evaluation",
    "Plant condition analysis",
    "Damage extent estimation",
    "Health status check",
    // treatment
    "How to treat this pest?",
    "Pesticide recommendations",
    "Organic pest control methods",
    "Disease treatment options",
    "Integrated pest management",
    "Biological control agents",
    "Chemical treatment advice",
    "Prevention strategies",
];

const FINANCE_AGENT: &[&str] = &[
    "Farm loan requirements",
    "Agricultural credit options",
    "Subsidy information",
    "Government schemes for farmers",
    "Investment planning for agriculture",
    "Financial assistance programs",
    "Crop insurance details",
    "Banking services for farmers",
    // costs
    "Farming cost estimation",
    "Input cost calculation",
    "Operational expense planning",
    "Budget preparation for crops",
    "Cost optimization strategies",
    "Expense tracking methods",
    "Financial record keeping",
    "Accounting for agriculture",
    // revenue
    "Income maximization strategies",
    "Value addition opportunities",
    "Direct marketing options",
    "Cooperative farming benefits",
    "Contract farming details",
    "Export market access",
    "Processing unit setup",
    "Agribusiness opportunities",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_classifiable_intent_has_examples() {
        let examples = builtin_examples();
        assert_eq!(examples.len(), Intent::CLASSIFIABLE.len());
        for (intent, (labelled, texts)) in Intent::CLASSIFIABLE.iter().zip(&examples) {
            assert_eq!(intent, labelled);
            assert!(texts.len() >= 24);
        }
    }
}
