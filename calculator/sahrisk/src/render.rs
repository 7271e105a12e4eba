//! Text and JSON presentation of assessments and model definitions.

use std::fmt;

use sahrisk_model::{Applicability, RiskModel, RiskResult};

use crate::assess::Assessment;

/// Human-readable report of one assessment.
pub struct TextReport<'a> {
    pub assessment: &'a Assessment,
    pub precision: usize,
}

impl TextReport<'_> {
    fn write_result(&self, f: &mut fmt::Formatter<'_>, result: &RiskResult) -> fmt::Result {
        let prec = self.precision;
        writeln!(f, "{}", result.model_name)?;
        match (result.probability, result.linear_predictor) {
            (Some(p), Some(z)) => {
                writeln!(f, "  linear score:   {z:.prec$}")?;
                if result.calibrated {
                    writeln!(f, "  predicted risk: {:.prec$}%", p * 100.0)?;
                } else {
                    writeln!(f, "  probability:    {:.prec$}% (uncalibrated)", p * 100.0)?;
                }
                if let Some(auc) = result.auc {
                    writeln!(f, "  model AUC:      {auc:.2}")?;
                }
            }
            _ => match result.applicability.exclusion_reason() {
                Some(reason) => writeln!(f, "  not applicable ({reason})")?,
                None => writeln!(f, "  not applicable")?,
            },
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patient = &self.assessment.patient;
        let results = &self.assessment.results;
        writeln!(
            f,
            "aSAH seizure risk: age {}, {}, WFNS {}, modified Fisher {}, CRP {} mg/L",
            patient.age(),
            patient.sex(),
            patient.wfns_grade(),
            patient.modified_fisher_grade(),
            patient.crp_mg_per_l()
        )?;
        for result in results {
            writeln!(f)?;
            self.write_result(f, result)?;
        }

        let severe_gated = results
            .iter()
            .any(|r| !r.applicable && r.applicability == Applicability::SevereWfns);
        let uncalibrated = results.iter().any(|r| r.applicable && !r.calibrated);
        if severe_gated || uncalibrated {
            writeln!(f)?;
        }
        if severe_gated {
            writeln!(
                f,
                "note: WFNS 4-5 models are not applicable as the WFNS grade is below 4"
            )?;
        }
        if uncalibrated {
            writeln!(
                f,
                "note: no intercept is published for these models; probabilities are the \
                 logistic of the linear score and rank patients, they are not calibrated risks"
            )?;
        }
        Ok(())
    }
}

pub fn render_text(assessment: &Assessment, precision: usize) -> String {
    TextReport {
        assessment,
        precision,
    }
    .to_string()
}

pub fn render_json(assessment: &Assessment) -> serde_json::Result<String> {
    serde_json::to_string_pretty(assessment)
}

pub fn render_models_text(models: &[RiskModel]) -> String {
    let mut out = String::new();
    for model in models {
        let terms = model
            .terms
            .iter()
            .map(|t| format!("{:+} * {}", t.weight, t.covariate))
            .collect::<Vec<_>>()
            .join(" ");
        let intercept = if model.intercept_published {
            model.intercept.to_string()
        } else {
            format!("{} (unpublished)", model.intercept)
        };
        out.push_str(&format!(
            "{} [{}]\n  applies to: {}\n  z = {} {}\n",
            model.name,
            model.id,
            model.applicability.describe(),
            intercept,
            terms
        ));
        if let Some(auc) = model.auc {
            out.push_str(&format!("  AUC: {auc:.2}\n"));
        }
    }
    out
}

pub fn render_models_json(models: &[RiskModel]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::{assess, assess_with};
    use sahrisk_model::{published_models, Term};
    use sahrisk_validate::FormInput;

    fn form(wfns: i64) -> FormInput {
        FormInput::new()
            .with("age", 60)
            .with("sex", "male")
            .with("wfns", wfns)
            .with("mfisher", 0)
            .with("crp", 0.0)
            .with("ld", false)
            .with("clipping", false)
            .with("early_seizure", false)
            .with("eeg_abnormal", false)
            .with("hcp", false)
            .with("ich", false)
    }

    fn assessment(wfns: i64) -> Assessment {
        assess(&form(wfns)).unwrap()
    }

    #[test]
    fn text_marks_gated_models_not_applicable() {
        let text = render_text(&assessment(2), 2);
        assert!(text.contains("Early seizure (general)"));
        assert!(text.contains("model AUC:      0.87"));
        assert!(text.contains("not applicable (WFNS grade below 4)"));
        assert!(text.contains("note: WFNS 4-5 models are not applicable"));
    }

    #[test]
    fn published_probabilities_are_labelled_uncalibrated() {
        let text = render_text(&assessment(1), 2);
        assert!(!text.contains("predicted risk"));
        assert!(text.contains("% (uncalibrated)"));
        assert!(text.contains("they are not calibrated risks"));
        let score = text.find("linear score").unwrap();
        let probability = text.find("probability:").unwrap();
        assert!(score < probability);
    }

    #[test]
    fn custom_models_keep_their_own_metadata() {
        const CALIBRATED: RiskModel = RiskModel {
            // reuses a published id with different metadata
            id: "early_general",
            name: "Calibrated early seizure",
            applicability: Applicability::AllPatients,
            intercept: -3.0,
            intercept_published: true,
            terms: &[Term::new("wfns", 0.5)],
            auc: Some(0.74),
        };
        const GATED: RiskModel = RiskModel {
            id: "gated",
            applicability: Applicability::SevereWfns,
            auc: None,
            ..CALIBRATED
        };
        let custom = assess_with(&form(2), &[CALIBRATED, GATED]).unwrap();
        let text = render_text(&custom, 2);
        assert!(text.contains("predicted risk:"), "{text}");
        assert!(text.contains("model AUC:      0.74"));
        assert!(!text.contains("0.87"));
        assert!(!text.contains("uncalibrated"));
        assert!(text.contains("not applicable (WFNS grade below 4)"));
    }

    #[test]
    fn gating_note_needs_a_gated_severe_model() {
        const GENERAL_ONLY: RiskModel = RiskModel {
            id: "general",
            name: "General",
            applicability: Applicability::AllPatients,
            intercept: 0.0,
            intercept_published: true,
            terms: &[Term::new("wfns", 0.5)],
            auc: None,
        };
        let custom = assess_with(&form(2), &[GENERAL_ONLY]).unwrap();
        let text = render_text(&custom, 2);
        assert!(!text.contains("note:"), "{text}");
    }

    #[test]
    fn text_uses_requested_precision() {
        // late general: 1.75 * 1 = 1.75
        let text = render_text(&assessment(1), 3);
        assert!(text.contains("linear score:   1.750"), "{text}");
    }

    #[test]
    fn severe_patients_get_no_gating_note() {
        let text = render_text(&assessment(5), 2);
        assert!(!text.contains("not applicable"));
    }

    #[test]
    fn json_has_null_probability_for_gated_models() {
        let json = render_json(&assessment(3)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[2]["applicable"], false);
        assert!(results[2]["probability"].is_null());
        assert_eq!(value["patient"]["wfns_grade"], 3);
    }

    #[test]
    fn model_listing_shows_every_term() {
        let text = render_models_text(published_models());
        assert!(text.contains("-1.9 * ld"));
        assert!(text.contains("+2.83 * wfns"));
        assert!(text.contains("z = 0 (unpublished)"));
        let json: serde_json::Value =
            serde_json::from_str(&render_models_json(published_models()).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert_eq!(json[3]["applicability"], "severe_wfns");
    }
}
