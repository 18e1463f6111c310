//! Integration test: extraction, distillation, and backend adapters end-to-end

use glassbox::prelude::*;
use ndarray::{array, Array1, Array2};

fn classification_data() -> (Array2<f64>, Array1<f64>, Vec<String>) {
    // f1 separates the classes; f2 is anti-correlated with f1; f3 is noise-like.
    let x = array![
        [1.0, 10.0, 0.1],
        [2.0, 9.0, 0.9],
        [3.0, 8.0, 0.2],
        [4.0, 7.0, 0.8],
        [5.0, 6.0, 0.3],
        [6.0, 5.0, 0.7],
        [7.0, 4.0, 0.4],
        [8.0, 3.0, 0.6],
        [9.0, 2.0, 0.5],
        [10.0, 1.0, 0.5],
    ];
    let y = array![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
    let names = vec!["f1".to_string(), "f2".to_string(), "f3".to_string()];
    (x, y, names)
}

#[test]
fn test_extract_from_fitted_tree_is_ranked() {
    let (x, y, names) = classification_data();
    let mut target = DecisionTree::new();
    target.fit(&x, &y).unwrap();

    let records = extract(&target, &names, &ExtractOptions::default()).unwrap();
    assert_eq!(records.len(), 3);
    for pair in records.windows(2) {
        assert!(pair[0].score.abs() >= pair[1].score.abs());
    }
}

#[test]
fn test_extract_from_fitted_logistic() {
    let (x, y, names) = classification_data();
    let mut target = LogisticRegression::new().with_max_iter(2000);
    target.fit(&x, &y).unwrap();

    // Raw coefficients, input order.
    let options = ExtractOptions {
        absolute_values: false,
        sort: false,
        limit: None,
    };
    let records = extract(&target, &names, &options).unwrap();
    assert_eq!(records.len(), 3);
    let features: Vec<&str> = records.iter().map(|r| r.feature.as_str()).collect();
    assert_eq!(features, vec!["f1", "f2", "f3"]);

    // Exponentiated scores are strictly positive.
    let options = ExtractOptions {
        absolute_values: true,
        sort: false,
        limit: None,
    };
    let exponentiated = extract(&target, &names, &options).unwrap();
    assert!(exponentiated.iter().all(|r| r.score > 0.0));
}

#[test]
fn test_distill_tree_target_into_linear_surrogate() {
    let (x, y, names) = classification_data();
    let mut target = DecisionTree::new();
    target.fit(&x, &y).unwrap();

    let config = SurrogateConfig::new(SurrogateKind::Linear).with_max_iter(2000);
    let result = distill(&target, &x, &names, 2, &config).unwrap();

    assert_eq!(result.feature_importances.len(), 2);
    for record in &result.feature_importances {
        assert!(names.contains(&record.feature));
    }
}

#[test]
fn test_distill_linear_target_into_tree_surrogate() {
    let (x, y, names) = classification_data();
    let mut target = LogisticRegression::new().with_max_iter(2000);
    target.fit(&x, &y).unwrap();

    let config = SurrogateConfig::new(SurrogateKind::Tree);
    let result = distill(&target, &x, &names, 2, &config).unwrap();

    assert_eq!(result.feature_importances.len(), 2);

    // The surrogate mimics the target over the reduced feature space.
    match &result.surrogate {
        Surrogate::Tree(tree) => assert!(tree.get_depth() >= 1),
        other => panic!("expected a tree surrogate, got {:?}", other),
    }
}

#[test]
fn test_distill_is_idempotent() {
    let (x, y, names) = classification_data();
    let mut target = DecisionTree::new();
    target.fit(&x, &y).unwrap();

    let config = SurrogateConfig::new(SurrogateKind::Tree);
    let first = distill(&target, &x, &names, 2, &config).unwrap();
    let second = distill(&target, &x, &names, 2, &config).unwrap();

    assert_eq!(first.feature_importances, second.feature_importances);
}

#[test]
fn test_distilled_surrogate_fidelity() {
    let (x, y, names) = classification_data();
    let mut target = DecisionTree::new();
    target.fit(&x, &y).unwrap();
    let target_pred = target.predict(&x).unwrap();

    let config = SurrogateConfig::new(SurrogateKind::Tree);
    let result = distill(&target, &x, &names, 1, &config).unwrap();

    // Rebuild the reduced matrix from the reported features and compare
    // surrogate output against the target's own predictions.
    let selected: Vec<usize> = result
        .feature_importances
        .iter()
        .map(|r| names.iter().position(|n| n == &r.feature).unwrap())
        .collect();
    let x_reduced = x.select(ndarray::Axis(1), &selected);
    let surrogate_pred = result.surrogate.predict(&x_reduced).unwrap();

    let agreement = surrogate_pred
        .iter()
        .zip(target_pred.iter())
        .filter(|(s, t)| (*s - *t).abs() < 0.5)
        .count();
    assert!(agreement >= 9, "only {} of 10 agree with the target", agreement);
}

mod stub_engines {
    use super::*;
    use glassbox::explainability::ProbaFn;

    #[derive(Debug)]
    pub struct Figure;

    impl Renderable for Figure {}

    #[derive(Debug)]
    pub struct Explanation {
        pub pairs: Vec<(String, f64)>,
    }

    impl RankedExplanation for Explanation {
        fn contributions(&self) -> Vec<(String, f64)> {
            self.pairs.clone()
        }

        fn figure(&self) -> Result<Box<dyn Renderable>> {
            Ok(Box::new(Figure))
        }
    }

    pub struct Explainer {
        feature_names: Vec<String>,
    }

    impl TabularExplainer for Explainer {
        type Explanation = Explanation;

        fn explain_instance(
            &self,
            instance: &Array1<f64>,
            predict_proba: ProbaFn<'_>,
            _options: &ExplanationOptions,
        ) -> Result<Self::Explanation> {
            let data = instance.clone().insert_axis(ndarray::Axis(0));
            let p = predict_proba(&data)?[0];
            let mut pairs: Vec<(String, f64)> = self
                .feature_names
                .iter()
                .zip(instance.iter())
                .map(|(name, value)| (name.clone(), value * p))
                .collect();
            // Engines rank their own output.
            pairs.sort_by(|a, b| {
                b.1.abs()
                    .partial_cmp(&a.1.abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            Ok(Explanation { pairs })
        }

        fn coverage_pick(
            &self,
            data: &Array2<f64>,
            predict_proba: ProbaFn<'_>,
            num_desired: usize,
            options: &ExplanationOptions,
        ) -> Result<Vec<Self::Explanation>> {
            (0..num_desired.min(data.nrows()))
                .map(|i| self.explain_instance(&data.row(i).to_owned(), predict_proba, options))
                .collect()
        }
    }

    pub struct Engine;

    impl TabularEngine for Engine {
        type Explainer = Explainer;

        fn build_explainer(
            &self,
            _training_data: &Array2<f64>,
            feature_names: &[String],
            _class_names: &[String],
            _config: &TabularExplainerConfig,
        ) -> Result<Self::Explainer> {
            Ok(Explainer {
                feature_names: feature_names.to_vec(),
            })
        }
    }
}

#[test]
fn test_tabular_backend_over_distilled_surrogate() {
    let (x, y, names) = classification_data();
    let mut target = DecisionTree::new();
    target.fit(&x, &y).unwrap();

    // Distill into a linear surrogate, then explain one of its predictions.
    let config = SurrogateConfig::new(SurrogateKind::Linear).with_max_iter(2000);
    let result = distill(&target, &x, &names, 2, &config).unwrap();

    let selected: Vec<usize> = result
        .feature_importances
        .iter()
        .map(|r| names.iter().position(|n| n == &r.feature).unwrap())
        .collect();
    let x_reduced = x.select(ndarray::Axis(1), &selected);
    let reduced_names: Vec<String> = result
        .feature_importances
        .iter()
        .map(|r| r.feature.clone())
        .collect();

    let backend = TabularBackend::new(stub_engines::Engine);
    let classes = vec!["low".to_string(), "high".to_string()];
    let envelope = backend
        .explain_instance(
            &result.surrogate,
            &x_reduced.row(0).to_owned(),
            &x_reduced,
            &reduced_names,
            &classes,
            &TabularExplainerConfig::default(),
            &ExplanationOptions::default(),
        )
        .unwrap();

    let records = envelope.feature_importances.unwrap();
    assert_eq!(records.len(), 2);
    assert!(envelope.figure.is_some());
}

#[test]
fn test_tabular_backend_rejects_tree_surrogate() {
    let (x, y, names) = classification_data();
    let mut target = DecisionTree::new();
    target.fit(&x, &y).unwrap();

    let config = SurrogateConfig::new(SurrogateKind::Tree);
    let result = distill(&target, &x, &names, 2, &config).unwrap();

    // Tree surrogates expose no probability surface, so the backend must
    // fail fast with the model-kind error.
    let backend = TabularBackend::new(stub_engines::Engine);
    let classes = vec!["low".to_string(), "high".to_string()];
    let err = backend
        .explain_dataset(
            &result.surrogate,
            &x,
            &names,
            &classes,
            &TabularExplainerConfig::default(),
            &ExplanationOptions::default(),
        )
        .unwrap_err();

    assert!(matches!(err, GlassboxError::UnsupportedModelKind(_)));
}
