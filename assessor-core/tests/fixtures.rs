use assessor_core::{
    AssessmentData, AssessmentSource, Assessor, Person, ProposalNumber, ProposalResult,
    ReportFormat, Selection, VotingStrength, calculate_rewards, render_rewards, resolve,
};
use std::path::PathBuf;
use std::{fs, io};

/// The sample definitions shipped at the repository root.
struct FixtureSource {
    root: PathBuf,
}

impl FixtureSource {
    fn new() -> Self {
        Self {
            root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../assessments"),
        }
    }
}

impl AssessmentSource for FixtureSource {
    type Error = io::Error;

    fn definition_names(&self) -> Result<Vec<String>, Self::Error> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn load_definition(&self, name: &str) -> Result<String, Self::Error> {
        fs::read_to_string(self.root.join(name))
    }
}

fn load(name: &str) -> AssessmentData {
    let catalog = Assessor::new(FixtureSource::new()).load_catalog().unwrap();
    catalog
        .select(&Selection::Named(name.to_string()))
        .unwrap()
        .remove(0)
        .clone()
}

#[test]
fn every_fixture_compiles_and_resolves() {
    let assessor = Assessor::new(FixtureSource::new());
    let catalog = assessor.load_catalog().unwrap();
    assert_eq!(catalog.names().collect::<Vec<_>>(), ["8558", "8600-8602"]);
    for data in catalog.select(&Selection::All).unwrap() {
        for format in [
            ReportFormat::Human,
            ReportFormat::Short,
            ReportFormat::Json,
            ReportFormat::Rewards,
        ] {
            assert!(assessor.assess(data, format).is_ok());
        }
    }
}

#[test]
fn silver_quill_is_adopted() {
    let data = load("8558");
    let jason = Person::new("Jason");
    let lee = Person::new("R. Lee");
    let strengths = data.voting_strengths_of(ProposalNumber(8558)).unwrap();
    assert_eq!(strengths.get(&jason), VotingStrength::from_integer(6));
    assert_eq!(strengths.get(&lee), VotingStrength::from_integer(1));

    let resolutions = resolve(&data).unwrap();
    let resolution = resolutions.resolution_of(ProposalNumber(8558)).unwrap();
    assert_eq!(resolution.result, ProposalResult::Adopted);
    assert_eq!(
        resolution.strengths.strength_for,
        VotingStrength::from_integer(12)
    );
    assert_eq!(
        resolution.strengths.strength_against,
        VotingStrength::from_integer(1)
    );
    assert_eq!(resolution.votes.vote_count(), 5);

    let rewards = calculate_rewards(&resolutions).unwrap();
    assert_eq!(
        render_rewards(&rewards),
        "For the adoption of Proposal 8558, I grant Aris 3-1=2 coins."
    );
}

#[test]
fn mixed_assessment_resolves_each_proposal() {
    let data = load("8600-8602");
    let resolutions = resolve(&data).unwrap();
    let result = |number| {
        resolutions
            .resolution_of(ProposalNumber(number))
            .unwrap()
            .result
    };
    assert_eq!(result(8600), ProposalResult::Adopted);
    assert_eq!(result(8601), ProposalResult::Rejected);
    assert_eq!(result(8602), ProposalResult::FailedQuorum);

    let jason = Person::new("Jason");
    let murphy = Person::new("Murphy");
    let strength = |number, person: &Person| {
        data.voting_strengths_of(ProposalNumber(number))
            .unwrap()
            .get(person)
    };
    assert_eq!(strength(8600, &jason), VotingStrength::from_integer(4));
    assert_eq!(strength(8601, &jason), VotingStrength::from_integer(6));
    assert_eq!(strength(8602, &jason), VotingStrength::from_integer(3));
    assert_eq!(strength(8602, &murphy), VotingStrength::from_integer(6));

    let adopted: Vec<ProposalNumber> = resolutions.adopted_proposals().numbers().collect();
    assert_eq!(adopted, [ProposalNumber(8600)]);
    let failed: Vec<ProposalNumber> = resolutions
        .proposals_with_result(ProposalResult::FailedQuorum)
        .numbers()
        .collect();
    assert_eq!(failed, [ProposalNumber(8602)]);
    assert_eq!(resolutions.proposals().len(), 3);

    assert_eq!(
        render_rewards(&calculate_rewards(&resolutions).unwrap()),
        "For the adoption of Proposal 8600, I grant Jason 3-1=2 coins."
    );
}

#[test]
fn unknown_fixture_lists_known_names() {
    let catalog = Assessor::new(FixtureSource::new()).load_catalog().unwrap();
    let err = catalog
        .select(&Selection::Named("8000".to_string()))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "no assessment named 8000; known assessments: 8558, 8600-8602"
    );
}
