/// Fixed question script read out by the AI interviewer, in order.
pub const QUESTIONS: [&str; 6] = [
    "Hello! Welcome to your SELECTRA AI interview. Please introduce yourself and tell me about your background.",
    "Can you describe a challenging project you've worked on and how you overcame the obstacles?",
    "What motivates you in your professional career, and what are your long-term goals?",
    "How do you handle working under pressure and tight deadlines?",
    "Tell me about a time when you had to work with a difficult team member.",
    "Where do you see yourself in 5 years, and how does this role fit into your career plans?",
];
