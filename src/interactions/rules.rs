use super::InteractionRule;

pub fn default_rules() -> Vec<InteractionRule> {
    vec![
        InteractionRule::new(
            &["warfarin"],
            &["aspirin", "ibuprofen", "naproxen"],
            "Increased bleeding risk - NSAIDs increase anticoagulant effect",
        ),
        InteractionRule::new(
            &["warfarin"],
            &["fluconazole"],
            "Warfarin levels increased - risk of bleeding",
        ),
        InteractionRule::new(
            &["ssri", "sertraline", "fluoxetine", "escitalopram"],
            &["maoi"],
            "Serotonin syndrome - potentially fatal",
        ),
        InteractionRule::new(
            &["ssri", "sertraline", "fluoxetine"],
            &["tramadol"],
            "Serotonin syndrome risk - monitor closely",
        ),
        InteractionRule::new(
            &["opioid", "hydrocodone", "oxycodone", "morphine", "fentanyl"],
            &["benzodiazepine", "alprazolam", "diazepam"],
            "Respiratory depression - high overdose risk",
        ),
        InteractionRule::new(
            &["metformin"],
            &["contrast dye"],
            "Lactic acidosis risk - hold metformin",
        ),
        InteractionRule::new(
            &["simvastatin", "atorvastatin"],
            &["clarithromycin", "erythromycin"],
            "Rhabdomyolysis risk - statin toxicity",
        ),
        InteractionRule::new(
            &["sildenafil", "tadalafil"],
            &["nitrate", "nitroglycerin"],
            "Severe hypotension - contraindicated",
        ),
        InteractionRule::new(
            &["lisinopril", "losartan"],
            &["potassium"],
            "Hyperkalemia risk - monitor potassium",
        ),
        InteractionRule::new(
            &["clopidogrel"],
            &["omeprazole"],
            "Reduced clopidogrel efficacy",
        ),
        InteractionRule::new(
            &["methotrexate"],
            &["nsaid", "ibuprofen", "naproxen"],
            "Methotrexate toxicity",
        ),
        InteractionRule::new(
            &["lithium"],
            &["nsaid", "ibuprofen", "naproxen"],
            "Lithium toxicity",
        ),
        InteractionRule::new(
            &["digoxin"],
            &["amiodarone"],
            "Digoxin toxicity - reduce dose",
        ),
    ]
}
