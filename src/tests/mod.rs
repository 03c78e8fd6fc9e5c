mod test_dashboard_flow;
