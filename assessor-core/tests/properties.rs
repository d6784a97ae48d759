use assessor_core::error::{ConfigError, DefinitionError};
use assessor_core::{
    AssessmentBuilder, AssessmentData, Person, ProposalNumber, ProposalResult, StrengthScope,
    Vote, VoteKind, VotingStrength, parse_assessment, resolve,
};

fn definition(strengths: &str, proposals: &[u32], voting: &str) -> String {
    let proposals = proposals
        .iter()
        .map(|number| {
            format!(r#"{{ "number": {number}, "title": "P{number}", "ai": "1.0", "author": "Aris" }}"#)
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"{{
            "name": "properties",
            "quorum": 3,
            "strengths": {strengths},
            "proposals": [ {proposals} ],
            "voting": {voting}
        }}"#
    )
}

fn compile(strengths: &str, proposals: &[u32], voting: &str) -> AssessmentData {
    parse_assessment(&definition(strengths, proposals, voting)).unwrap()
}

fn result_of(data: &AssessmentData, number: u32) -> ProposalResult {
    resolve(data)
        .unwrap()
        .resolution_of(ProposalNumber(number))
        .unwrap()
        .result
}

#[test]
fn two_ballots_fail_a_quorum_of_three() {
    let data = compile(
        r#"{ "default": 100 }"#,
        &[1],
        r#"[
            { "voter": "A", "ballots": [ { "proposal": 1, "vote": "FOR" } ] },
            { "voter": "B", "ballots": [ { "proposal": 1, "vote": "FOR" } ] }
        ]"#,
    );
    assert_eq!(result_of(&data, 1), ProposalResult::FailedQuorum);
}

#[test]
fn adoption_boundary_is_exact() {
    let voting = r#"[
        { "voter": "F", "ballots": [ { "proposal": 1, "vote": "FOR" } ] },
        { "voter": "A", "ballots": [ { "proposal": 1, "vote": "AGAINST" } ] },
        { "voter": "P", "ballots": [ { "proposal": 1, "vote": "PRESENT" } ] }
    ]"#;
    let with_against = |against: &str| {
        definition(
            &format!(
                r#"{{ "default": 1, "global": [
                    {{ "op": "set", "person": "F", "value": 10 }},
                    {{ "op": "set", "person": "A", "value": "{against}" }}
                ] }}"#
            ),
            &[1],
            voting,
        )
        .replace(r#""ai": "1.0""#, r#""ai": "2.0""#)
    };

    let adopted = parse_assessment(&with_against("5")).unwrap();
    assert_eq!(result_of(&adopted, 1), ProposalResult::Adopted);

    let rejected = parse_assessment(&with_against("5.001")).unwrap();
    assert_eq!(result_of(&rejected, 1), ProposalResult::Rejected);
}

#[test]
fn nothing_for_and_nothing_against_is_rejected() {
    let data = compile(
        r#"{ "default": 0 }"#,
        &[1],
        r#"[
            { "voter": "A", "ballots": [ { "proposal": 1, "vote": "FOR" } ] },
            { "voter": "B", "ballots": [ { "proposal": 1, "vote": "AGAINST" } ] },
            { "voter": "C", "ballots": [ { "proposal": 1, "vote": "PRESENT" } ] }
        ]"#,
    );
    let resolutions = resolve(&data).unwrap();
    let resolution = resolutions.resolution_of(ProposalNumber(1)).unwrap();
    assert_eq!(resolution.result, ProposalResult::Rejected);
    assert_eq!(resolution.strengths.strength_for, VotingStrength::zero());
    assert_eq!(resolution.strengths.strength_against, VotingStrength::zero());
}

#[test]
fn strength_trails_layer_per_proposal() {
    let data = compile(
        r#"{
            "default": 3,
            "global": [ { "op": "set", "person": "Q", "value": 5 } ],
            "proposals": [ { "proposal": 7, "ops": [ { "op": "add", "person": "Q", "amount": 2 } ] } ]
        }"#,
        &[6, 7, 8],
        "[]",
    );
    let p = Person::new("P");
    let q = Person::new("Q");
    for number in [6, 7, 8] {
        let strengths = data.voting_strengths_of(ProposalNumber(number)).unwrap();
        assert_eq!(strengths.get(&p), VotingStrength::from_integer(3));
        let expected = if number == 7 { 7 } else { 5 };
        assert_eq!(strengths.get(&q), VotingStrength::from_integer(expected));
    }
    let seven = data.voting_strengths_of(ProposalNumber(7)).unwrap();
    assert_eq!(
        seven.trail_for(&q).descriptions(),
        ["set to 5", "+2"]
    );
}

#[test]
fn proposal_add_does_not_chain_from_other_proposals() {
    let data = compile(
        r#"{
            "default": 3,
            "proposals": [
                { "proposal": 1, "ops": [ { "op": "add", "person": "Q", "amount": 2 } ] },
                { "proposal": 2, "ops": [ { "op": "add", "person": "Q", "amount": 2 } ] }
            ]
        }"#,
        &[1, 2],
        "[]",
    );
    let q = Person::new("Q");
    for number in [1, 2] {
        assert_eq!(
            data.voting_strengths_of(ProposalNumber(number)).unwrap().get(&q),
            VotingStrength::from_integer(5)
        );
    }
}

#[test]
fn setting_a_strength_twice_is_fatal() {
    let err = parse_assessment(&definition(
        r#"{ "default": 3, "global": [
            { "op": "set", "person": "Q", "value": 5 },
            { "op": "set", "person": "Q", "value": 6 }
        ] }"#,
        &[1],
        "[]",
    ))
    .unwrap_err();
    assert!(matches!(
        err,
        DefinitionError::Config(ConfigError::DuplicateStrength {
            scope: StrengthScope::Global,
            ..
        })
    ));
}

#[test]
fn setting_a_field_twice_fails_at_the_second_call() {
    let mut builder = AssessmentBuilder::new();
    builder.quorum(3).unwrap();
    assert_eq!(
        builder.quorum(4).unwrap_err(),
        ConfigError::DuplicateField { field: "quorum" }
    );
}

#[test]
fn missing_default_strength_is_fatal() {
    let err = parse_assessment(&definition("{}", &[1], "[]")).unwrap_err();
    assert!(matches!(
        err,
        DefinitionError::Config(ConfigError::MissingField { .. })
    ));
}

#[test]
fn inextricable_vote_simplifies_to_present() {
    let late = Vote::Inextricable {
        comment: Some("late".to_string()),
    }
    .simplified();
    assert_eq!(late.kind, VoteKind::Present);
    assert_eq!(late.comment.as_deref(), Some("Inextricable: late"));

    let bare = Vote::Inextricable { comment: None }.simplified();
    assert_eq!(bare.kind, VoteKind::Present);
    assert_eq!(bare.comment.as_deref(), Some("Inextricable"));
}

#[test]
fn inextricable_ballot_counts_toward_quorum() {
    let data = compile(
        r#"{ "default": 1 }"#,
        &[1],
        r#"[
            { "voter": "A", "ballots": [ { "proposal": 1, "vote": "FOR" } ] },
            { "voter": "B", "ballots": [ { "proposal": 1, "inextricable": true, "comment": "late" } ] },
            { "voter": "C", "ballots": [ { "proposal": 1, "vote": "PRESENT" } ] }
        ]"#,
    );
    let resolutions = resolve(&data).unwrap();
    let resolution = resolutions.resolution_of(ProposalNumber(1)).unwrap();
    assert_eq!(resolution.result, ProposalResult::Adopted);
    let b = resolution.votes.get(&Person::new("B")).unwrap();
    assert_eq!(b.kind, VoteKind::Present);
    assert_eq!(b.comment.as_deref(), Some("Inextricable: late"));
}

#[test]
fn votes_for_an_unknown_proposal_name_it() {
    let err = parse_assessment(&definition(
        r#"{ "default": 1 }"#,
        &[1],
        r#"[ { "voter": "A", "ballots": [ { "proposal": 9999, "vote": "FOR" } ] } ]"#,
    ))
    .unwrap_err();
    assert!(matches!(
        err,
        DefinitionError::Config(ConfigError::VotesForUnknownProposal(ProposalNumber(9999)))
    ));
    assert!(err.to_string().contains("9999"));
}

#[test]
fn follow_cycles_become_inextricable() {
    let data = compile(
        r#"{ "default": 1 }"#,
        &[1],
        r#"[
            { "voter": "A", "ballots": [ { "proposal": 1, "follow": "B" } ] },
            { "voter": "B", "ballots": [ { "proposal": 1, "follow": "A" } ] },
            { "voter": "C", "ballots": [ { "proposal": 1, "follow": "D" } ] },
            { "voter": "D", "ballots": [ { "proposal": 1, "abstain": true } ] }
        ]"#,
    );
    let resolutions = resolve(&data).unwrap();
    let votes = &resolutions.resolution_of(ProposalNumber(1)).unwrap().votes;
    assert_eq!(votes.vote_count(), 2);
    assert_eq!(
        votes.get(&Person::new("A")).unwrap().kind,
        VoteKind::Present
    );
    assert!(votes.get(&Person::new("C")).is_err());
    assert!(votes.get(&Person::new("D")).is_err());
}

#[test]
fn resolving_twice_gives_equal_maps() {
    let data = compile(
        r#"{ "default": 2, "global": [ { "op": "add", "person": "A", "amount": 1 } ] }"#,
        &[1, 2],
        r#"[
            { "voter": "A", "ballots": [ { "proposal": 1, "vote": "FOR" }, { "proposal": 2, "vote": "AGAINST" } ] },
            { "voter": "B", "ballots": [ { "proposal": 1, "vote": "AGAINST", "comment": "no" } ] }
        ]"#,
    );
    assert_eq!(resolve(&data).unwrap(), resolve(&data).unwrap());
}
