#![no_main]
use arbitrary::Arbitrary;
use cfn_check::PatternMatcher;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    pattern: String,
    literal: String,
}

fuzz_target!(|input: Input| {
    let matched = PatternMatcher::matches(&input.pattern, &input.literal);

    if !input.pattern.contains('*') {
        assert_eq!(matched, input.pattern == input.literal);
    }
    assert!(PatternMatcher::matches("*", &input.literal));
});
