mod gates;
