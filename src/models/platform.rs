/// An external coding-practice site the dashboard links out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingPlatform {
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

pub const CODING_PLATFORMS: &[CodingPlatform] = &[
    CodingPlatform {
        name: "LeetCode",
        url: "https://leetcode.com",
        description: "Popular coding interview preparation platform",
    },
    CodingPlatform {
        name: "HackerRank",
        url: "https://hackerrank.com",
        description: "Coding challenges and skill assessments",
    },
    CodingPlatform {
        name: "CodeSignal",
        url: "https://codesignal.com",
        description: "Technical interviews and coding assessments",
    },
    CodingPlatform {
        name: "Codeforces",
        url: "https://codeforces.com",
        description: "Competitive programming contests",
    },
    CodingPlatform {
        name: "AtCoder",
        url: "https://atcoder.jp",
        description: "Japanese competitive programming platform",
    },
    CodingPlatform {
        name: "TopCoder",
        url: "https://topcoder.com",
        description: "Competitive programming and development challenges",
    },
    CodingPlatform {
        name: "Codewars",
        url: "https://codewars.com",
        description: "Coding kata and programming challenges",
    },
    CodingPlatform {
        name: "GeeksforGeeks",
        url: "https://practice.geeksforgeeks.org",
        description: "Programming practice and interview preparation",
    },
];

pub fn find_platform(name: &str) -> Option<&'static CodingPlatform> {
    CODING_PLATFORMS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}
